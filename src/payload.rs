use crate::measurement::{Measurement, Scale};

/// Number of bytes in one frame.
pub const FRAME_BYTES: usize = 5;
/// Number of bits in one frame.
pub const FRAME_BITS: usize = FRAME_BYTES * 8;

/// The five bytes sent by the sensor in one transaction.
///
/// Layout: humidity integer, humidity tenths, temperature integer,
/// temperature tenths, checksum.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Payload(pub [u8; FRAME_BYTES]);

impl Payload {
    /// Sum of the four data bytes, wrapping at 256.
    pub fn checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// The checksum byte as sent by the sensor.
    pub fn received_checksum(&self) -> u8 {
        self.0[4]
    }

    pub fn is_valid(&self) -> bool {
        self.checksum() == self.received_checksum()
    }

    /// Relative humidity in percent.
    pub fn humidity(&self) -> f32 {
        self.0[0] as f32 + self.0[1] as f32 / 10.0
    }

    /// Temperature in `scale`.
    pub fn temperature(&self, scale: Scale) -> f32 {
        let celsius = self.0[2] as f32 + self.0[3] as f32 / 10.0;
        scale.express(celsius)
    }

    /// Decodes the frame into a single-sample measurement.
    pub fn measurement(&self, scale: Scale) -> Measurement {
        Measurement::new(self.temperature(scale), self.humidity(), scale)
    }
}

/// Packs bits MSB first into a [`Payload`].
#[derive(Debug, Default)]
pub(crate) struct BitPacker {
    bytes: [u8; FRAME_BYTES],
    index: usize,
}

impl BitPacker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends the next bit. Bits past the end of the frame are ignored.
    pub(crate) fn push(&mut self, bit: bool) {
        if self.index >= FRAME_BITS {
            return;
        }
        let byte = &mut self.bytes[self.index / 8];
        *byte |= bit as u8;
        // Every bit but the last of a byte makes room for the next one
        if self.index % 8 != 7 {
            *byte <<= 1;
        }
        self.index += 1;
    }

    pub(crate) fn is_full(&self) -> bool {
        self.index == FRAME_BITS
    }

    pub(crate) fn finish(self) -> Payload {
        Payload(self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(bytes: [u8; FRAME_BYTES]) -> Payload {
        let mut packer = BitPacker::new();
        for byte in bytes {
            for i in 0..8 {
                packer.push((byte >> (7 - i)) & 1 == 1);
            }
        }
        assert!(packer.is_full());
        packer.finish()
    }

    #[test]
    fn test_checksum_valid() {
        let payload = Payload([10, 0, 25, 0, 35]);
        assert_eq!(payload.checksum(), 35);
        assert!(payload.is_valid());
        assert_eq!(payload.humidity(), 10.0);
        assert_eq!(payload.temperature(Scale::Celsius), 25.0);
    }

    #[test]
    fn test_checksum_invalid() {
        let payload = Payload([10, 0, 25, 0, 36]);
        assert!(!payload.is_valid());
        assert_eq!(payload.received_checksum(), 36);
    }

    #[test]
    fn test_checksum_wraps() {
        let payload = Payload([200, 9, 60, 5, 18]);
        assert_eq!(payload.checksum(), 18);
        assert!(payload.is_valid());
    }

    #[test]
    fn test_decode_tenths() {
        let payload = Payload([55, 5, 21, 7, 88]);
        assert_eq!(payload.humidity(), 55.5);
        assert_eq!(payload.temperature(Scale::Celsius), 21.7);
    }

    #[test]
    fn test_decode_other_scales() {
        let payload = Payload([40, 0, 25, 0, 65]);
        assert_eq!(payload.temperature(Scale::Kelvin), 298.0);
        assert_eq!(payload.temperature(Scale::Fahrenheit), 77.0);

        let m = payload.measurement(Scale::Kelvin);
        assert_eq!(m.scale(), Scale::Kelvin);
        assert_eq!(m.temperature(), 298.0);
        assert_eq!(m.humidity(), 40.0);
        assert_eq!(m.weight(), 1);
    }

    #[test]
    fn test_bit_packing_msb_first() {
        let payload = pack([0b1011_1010, 0x00, 0xFF, 0x01, 0x80]);
        assert_eq!(payload.0, [0b1011_1010, 0x00, 0xFF, 0x01, 0x80]);
    }

    #[test]
    fn test_bit_packing_ignores_overflow() {
        let mut packer = BitPacker::new();
        for _ in 0..FRAME_BITS + 3 {
            packer.push(true);
        }
        assert_eq!(packer.finish().0, [0xFF; FRAME_BYTES]);
    }
}
