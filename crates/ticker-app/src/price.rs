//! Maps graph samples onto a quoted price and formats the labels.

use serde::Deserialize;

use ticker_engine::coords::ColorRgba;

const UP_COLOR: ColorRgba = ColorRgba::new(0.0, 0.8, 0.0, 0.7);
const DOWN_COLOR: ColorRgba = ColorRgba::new(0.8, 0.0, 0.0, 0.7);

/// Linear mapping from a sample's position in its band to a price.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PriceModel {
    /// Price at the bottom of the band.
    pub base_price: f64,
    /// Price span covered by the full band.
    pub price_range: f64,
    /// Price the change is measured against.
    pub reference_price: f64,
}

impl Default for PriceModel {
    fn default() -> Self {
        Self {
            base_price: 113_900.0,
            price_range: 2_000.0,
            reference_price: 114_900.0,
        }
    }
}

impl PriceModel {
    /// `fraction` is the sample's normalized position, 0 at the band bottom.
    pub fn quote(&self, fraction: f64) -> Quote {
        let price = self.base_price + fraction * self.price_range;
        let change = price - self.reference_price;
        Quote {
            price,
            change,
            change_percent: change / self.reference_price * 100.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl Quote {
    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }

    pub fn price_label(&self) -> String {
        format_grouped(self.price, 2)
    }

    /// Unsigned percentage, three spaces, then the signed grouped change.
    pub fn change_label(&self) -> String {
        format!(
            "{:.2}%   {}",
            self.change_percent.abs(),
            format_grouped(self.change, 2)
        )
    }

    pub fn change_color(&self) -> ColorRgba {
        if self.is_up() { UP_COLOR } else { DOWN_COLOR }
    }
}

/// Fixed-point formatting with `,` between groups of three integer digits.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    if !value.is_finite() {
        return fixed;
    }

    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_grouped(0.0, 2), "0.00");
        assert_eq!(format_grouped(999.5, 2), "999.50");
        assert_eq!(format_grouped(1_000.0, 2), "1,000.00");
        assert_eq!(format_grouped(113_900.0, 2), "113,900.00");
        assert_eq!(format_grouped(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(format_grouped(-1_140.87, 2), "-1,140.87");
        assert_eq!(format_grouped(12_345.0, 0), "12,345");
    }

    #[test]
    fn non_finite_passes_through() {
        assert_eq!(format_grouped(f64::NAN, 2), "NaN");
    }

    #[test]
    fn band_bottom_quotes_base_price() {
        let q = PriceModel::default().quote(0.0);
        assert_eq!(q.price_label(), "113,900.00");
        assert_eq!(q.change_label(), "0.87%   -1,000.00");
        assert!(!q.is_up());
        assert_eq!(q.change_color(), DOWN_COLOR);
    }

    #[test]
    fn band_top_is_up() {
        let q = PriceModel::default().quote(1.0);
        assert_eq!(q.price_label(), "115,900.00");
        assert_eq!(q.change_label(), "0.87%   1,000.00");
        assert_eq!(q.change_color(), UP_COLOR);
    }

    #[test]
    fn reference_price_counts_as_up() {
        let q = PriceModel::default().quote(0.5);
        assert_eq!(q.price_label(), "114,900.00");
        assert_eq!(q.change_label(), "0.00%   0.00");
        assert!(q.is_up());
    }
}
