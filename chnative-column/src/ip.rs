use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use chnative_dtype::{DType, TypeRef};
use chnative_error::{ChResult, ch_bail, ch_err};

use crate::column::{delegate_column, delegate_word_pairs};
use crate::{Column, UInt32Column, UInt64Column};

/// IPv4 addresses, one 32-bit word each.
///
/// The stored word holds the address in network byte order, so its wire bytes are the address
/// octets in their usual order. [`Ipv4Column::at`] returns the address in host order.
#[derive(Debug, Clone)]
pub struct Ipv4Column {
    dtype: TypeRef,
    data: UInt32Column,
}

impl Ipv4Column {
    /// An empty column.
    pub fn new() -> Self {
        Self::from_data(UInt32Column::new())
    }

    /// A column over existing words, which must already be in network byte order.
    pub fn from_data(data: UInt32Column) -> Self {
        Self {
            dtype: Arc::new(DType::IPv4),
            data,
        }
    }

    /// Appends an address.
    pub fn append(&mut self, addr: Ipv4Addr) {
        self.append_u32(u32::from(addr));
    }

    /// Appends an address given as a host-order number, such as `0xC0A8_0101` for
    /// `192.168.1.1`.
    pub fn append_u32(&mut self, host: u32) {
        self.data.append(host.to_be());
    }

    /// Appends an address in dotted-quad notation.
    pub fn append_str(&mut self, text: &str) -> ChResult<()> {
        let addr = text
            .parse::<Ipv4Addr>()
            .map_err(|_| ch_err!(FormatError: "invalid IPv4 address '{text}'"))?;
        self.append(addr);
        Ok(())
    }

    /// The address at `index` as a host-order number.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> u32 {
        u32::from_be(self.data.at(index))
    }

    /// The address at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn addr(&self, index: usize) -> Ipv4Addr {
        Ipv4Addr::from(self.at(index))
    }

    /// The address at `index` in dotted-quad notation.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn to_string(&self, index: usize) -> String {
        self.addr(index).to_string()
    }

    /// The stored words.
    pub fn data(&self) -> &UInt32Column {
        &self.data
    }
}

impl Default for Ipv4Column {
    fn default() -> Self {
        Self::new()
    }
}

delegate_column!(Ipv4Column);

/// IPv6 addresses, two 64-bit words each.
///
/// The words are the first and last eight address octets, taken as they lie in memory, so the
/// wire bytes of a row are the sixteen octets in order.
#[derive(Debug, Clone)]
pub struct Ipv6Column {
    dtype: TypeRef,
    data: UInt64Column,
}

impl Ipv6Column {
    /// An empty column.
    pub fn new() -> Self {
        Self {
            dtype: Arc::new(DType::IPv6),
            data: UInt64Column::new(),
        }
    }

    /// A column over existing word pairs.
    ///
    /// Fails with a format error if `data` holds an odd number of words.
    pub fn from_data(data: UInt64Column) -> ChResult<Self> {
        if data.len() % 2 != 0 {
            ch_bail!(
                FormatError: "IPv6 data needs two 64-bit words per address, got {} words",
                data.len()
            );
        }
        Ok(Self {
            dtype: Arc::new(DType::IPv6),
            data,
        })
    }

    /// Appends an address.
    pub fn append(&mut self, addr: Ipv6Addr) {
        self.push_octets(addr.octets());
    }

    /// Appends an address given as its sixteen raw octets.
    pub fn append_bytes(&mut self, octets: &[u8]) -> ChResult<()> {
        let octets = <[u8; 16]>::try_from(octets).map_err(|_| {
            ch_err!(
                FormatError: "IPv6 address must be 16 bytes, got {}",
                octets.len()
            )
        })?;
        self.push_octets(octets);
        Ok(())
    }

    /// Appends an address in any standard IPv6 text form.
    pub fn append_str(&mut self, text: &str) -> ChResult<()> {
        let addr = text
            .parse::<Ipv6Addr>()
            .map_err(|_| ch_err!(FormatError: "invalid IPv6 address '{text}'"))?;
        self.append(addr);
        Ok(())
    }

    fn push_octets(&mut self, octets: [u8; 16]) {
        let (high, low) = octets.split_at(8);
        for half in [high, low] {
            let mut word = [0u8; 8];
            word.copy_from_slice(half);
            self.data.append(u64::from_le_bytes(word));
        }
    }

    /// The two stored words of the address at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> (u64, u64) {
        (self.data.at(index * 2), self.data.at(index * 2 + 1))
    }

    /// The address at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn addr(&self, index: usize) -> Ipv6Addr {
        let (high, low) = self.at(index);
        let mut octets = [0u8; 16];
        octets[..8].copy_from_slice(&high.to_le_bytes());
        octets[8..].copy_from_slice(&low.to_le_bytes());
        Ipv6Addr::from(octets)
    }

    /// The address at `index` in its canonical text form.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn to_string(&self, index: usize) -> String {
        self.addr(index).to_string()
    }

    /// The stored words.
    pub fn data(&self) -> &UInt64Column {
        &self.data
    }
}

impl Default for Ipv6Column {
    fn default() -> Self {
        Self::new()
    }
}

delegate_word_pairs!(Ipv6Column);

#[cfg(test)]
mod tests {
    use chnative_error::ChError;
    use rstest::rstest;

    use super::*;

    #[test]
    fn ipv4_text_round_trip() {
        let mut column = Ipv4Column::new();
        column.append_str("192.168.1.1").unwrap();
        assert_eq!(column.to_string(0), "192.168.1.1");
        assert_eq!(column.at(0), 0xC0A8_0101);
        assert_eq!(column.addr(0), Ipv4Addr::new(192, 168, 1, 1));
    }

    #[rstest]
    #[case("999.1.1.1")]
    #[case("1.2.3")]
    #[case("localhost")]
    #[case("")]
    fn ipv4_rejects_bad_text(#[case] text: &str) {
        let mut column = Ipv4Column::new();
        let err = column.append_str(text).unwrap_err();
        assert!(matches!(err, ChError::FormatError(..)));
        assert!(err.to_string().contains(text));
        assert!(column.is_empty());
    }

    #[test]
    fn ipv4_wire_is_network_order() {
        let mut column = Ipv4Column::new();
        column.append_u32(0x0A00_0001);
        column.append(Ipv4Addr::BROADCAST);
        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire, [10, 0, 0, 1, 255, 255, 255, 255]);

        let mut loaded = Ipv4Column::new();
        loaded.load(&mut wire.as_slice(), 2).unwrap();
        assert_eq!(loaded.to_string(0), "10.0.0.1");
        assert_eq!(loaded.to_string(1), "255.255.255.255");
    }

    #[test]
    fn ipv6_text_round_trip() {
        let mut column = Ipv6Column::new();
        column.append_str("2001:db8::ff00:42:8329").unwrap();
        column.append_str("::1").unwrap();
        assert_eq!(column.len(), 2);
        assert_eq!(column.to_string(0), "2001:db8::ff00:42:8329");
        assert_eq!(column.to_string(1), "::1");
        assert_eq!(column.at(1), (0, 1 << 56));
    }

    #[test]
    fn ipv6_rejects_bad_input() {
        let mut column = Ipv6Column::new();
        assert!(matches!(
            column.append_str("2001:db8:::1"),
            Err(ChError::FormatError(..))
        ));
        assert!(matches!(
            column.append_bytes(&[0; 15]),
            Err(ChError::FormatError(..))
        ));
        assert!(column.is_empty());
        column.append_bytes(&[0xfe; 16]).unwrap();
        assert_eq!(column.len(), 1);
    }

    #[test]
    fn ipv6_wire_is_octets() {
        let addr: Ipv6Addr = "fe80::1:2".parse().unwrap();
        let mut column = Ipv6Column::new();
        column.append(addr);
        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire, addr.octets());

        let mut loaded = Ipv6Column::new();
        loaded.load(&mut wire.as_slice(), 1).unwrap();
        assert_eq!(loaded.addr(0), addr);
    }

    #[test]
    fn ipv6_row_count_invariant() {
        let odd: UInt64Column = (0..3).collect();
        assert!(matches!(
            Ipv6Column::from_data(odd),
            Err(ChError::FormatError(..))
        ));

        let even: UInt64Column = (0..6).collect();
        let column = Ipv6Column::from_data(even).unwrap();
        assert_eq!(column.len(), 3);
        assert_eq!(column.at(2), (4, 5));
    }

    #[test]
    fn ipv6_load_reads_two_words_per_row() {
        let mut column = Ipv6Column::new();
        let err = column.load(&mut [0u8; 24].as_slice(), 2).unwrap_err();
        assert!(matches!(err, ChError::UnexpectedEof(32, 24, _)));
        assert!(column.is_empty());
    }

    #[test]
    fn ipv6_slice_maps_rows_to_words() {
        let column = Ipv6Column::from_data((0..10).collect()).unwrap();
        let slice = column.slice(1, 3).unwrap();
        let slice = slice.downcast_ref::<Ipv6Column>().unwrap();
        assert_eq!(slice.len(), 3);
        assert_eq!(slice.data().values(), &[2, 3, 4, 5, 6, 7]);
        assert!(column.slice(4, 2).is_err());
    }

    #[test]
    fn merge_ignores_other_kinds() {
        let mut v6 = Ipv6Column::new();
        let mut v4 = Ipv4Column::new();
        v4.append(Ipv4Addr::LOCALHOST);
        v6.append_column(&v4);
        assert!(v6.is_empty());

        let mut more = Ipv4Column::new();
        more.append_column(&v4);
        assert_eq!(more.to_string(0), "127.0.0.1");
    }
}
