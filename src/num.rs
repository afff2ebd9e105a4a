use alloy::primitives::U256;
use fastnum::{
    bint,
    decimal::{Context, RoundingMode, UnsignedDecimal},
};

/// Converter between minor-unit token quantities and human decimal
/// quantities, scaled by the token's decimal precision.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    decimals: i32,
}

impl Converter {
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals: decimals as i32,
        }
    }

    /// Minor units -> human decimal quantity.
    pub fn to_decimal<const N: usize>(&self, value: U256) -> UnsignedDecimal<N> {
        let unscaled = bint::UInt::<N>::from_le_slice(value.as_le_slice())
            .expect("Converter: U256 -> UInt::<N>");
        UnsignedDecimal::<N>::from_parts(
            unscaled,
            -self.decimals,
            Context::default().with_rounding_mode(RoundingMode::Floor),
        )
    }

    /// Human decimal quantity -> minor units.
    pub fn to_minor_units<const N: usize>(&self, value: UnsignedDecimal<N>) -> U256 {
        let rescaled = value.rescale(self.decimals as i16);
        U256::from_le_slice(rescaled.digits().to_radix_le(256).as_slice())
    }

    /// Whole token quantity -> minor units.
    pub fn whole(&self, qty: u64) -> U256 {
        U256::from(qty) * U256::from(10).pow(U256::from(self.decimals))
    }
}

#[cfg(test)]
mod tests {
    use fastnum::udec256;

    use super::*;

    #[test]
    fn test_converter_to_decimal() {
        assert_eq!(
            Converter::new(0).to_decimal(U256::from(1234567890)),
            udec256!(1234567890)
        );
        assert_eq!(
            Converter::new(6).to_decimal(U256::from(1234567890)),
            udec256!(1234.56789)
        );
        assert_eq!(
            Converter::new(12).to_decimal(U256::from(1234567890)),
            udec256!(0.00123456789)
        );
    }

    #[test]
    fn test_converter_to_minor_units() {
        assert_eq!(
            Converter::new(0).to_minor_units(udec256!(1234567890)),
            U256::from(1234567890)
        );
        assert_eq!(
            Converter::new(6).to_minor_units(udec256!(1234.56789)),
            U256::from(1234567890)
        );
        assert_eq!(
            Converter::new(12).to_minor_units(udec256!(0.00123456789)),
            U256::from(1234567890)
        );
    }

    #[test]
    fn test_deposit_quantity_scaling() {
        // 5000 tokens with 18 decimals submit as 5000 * 10^18 minor units
        let expected = U256::from(5000u64) * U256::from(10).pow(U256::from(18));
        assert_eq!(Converter::new(18).to_minor_units(udec256!(5000)), expected);
        assert_eq!(Converter::new(18).whole(5000), expected);
    }

    #[test]
    fn test_fractional_quantity() {
        assert_eq!(
            Converter::new(2).to_minor_units(udec256!(1.23)),
            U256::from(123)
        );
    }
}
