pub use chnative_column::*;
pub use {
    chnative_column as column, chnative_dtype as dtype, chnative_error as error,
    chnative_io as io,
};
