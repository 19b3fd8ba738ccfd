use rust_decimal::Decimal;

use super::quotes_model::QuoteLine;
use crate::constants::ECO_FEE_RATE;
use crate::products::Product;

/// Derived pricing fields for a single quote line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePricing {
    pub tax_amount: Decimal,
    pub eco_fee: Decimal,
    pub unit_price_incl_tax: Decimal,
    pub total_incl_tax: Decimal,
    pub weight_kg: Option<Decimal>,
}

/// Quote-level totals recomputed from persisted lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuoteTotals {
    pub total_incl_tax: Decimal,
    pub total_weight_kg: Decimal,
}

/// Computes the derived fields of one line from its source fields and the
/// referenced product. All arithmetic stays in `Decimal`; repeated aggregation
/// must not drift.
pub fn price_line(
    unit_price: Decimal,
    quantity: i32,
    tax_rate: Decimal,
    product: &Product,
) -> LinePricing {
    let tax_amount = unit_price * tax_rate;
    let eco_fee = if product.has_eco_fee {
        unit_price * ECO_FEE_RATE
    } else {
        Decimal::ZERO
    };
    let unit_price_incl_tax = unit_price + tax_amount + eco_fee;

    let quantity = Decimal::from(quantity);
    let total_incl_tax = unit_price_incl_tax * quantity;
    let weight_kg = product.unit_weight_kg.map(|w| w * quantity);

    LinePricing {
        tax_amount,
        eco_fee,
        unit_price_incl_tax,
        total_incl_tax,
        weight_kg,
    }
}

/// Sums line totals and weights. Empty line sets yield zero totals; lines
/// without a weight count as zero weight.
pub fn aggregate_totals(lines: &[QuoteLine]) -> QuoteTotals {
    lines.iter().fold(QuoteTotals::default(), |acc, line| {
        QuoteTotals {
            total_incl_tax: acc.total_incl_tax + line.total_incl_tax,
            total_weight_kg: acc.total_weight_kg + line.weight_kg.unwrap_or(Decimal::ZERO),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(has_eco_fee: bool, unit_weight_kg: Option<Decimal>) -> Product {
        Product {
            id: "prod-1".to_string(),
            code: "P-001".to_string(),
            label: "Test product".to_string(),
            has_eco_fee,
            unit_weight_kg,
            is_active: true,
            ..Default::default()
        }
    }

    fn line_with(total_incl_tax: Decimal, weight_kg: Option<Decimal>) -> QuoteLine {
        QuoteLine {
            total_incl_tax,
            weight_kg,
            ..Default::default()
        }
    }

    #[test]
    fn prices_a_plain_line() {
        // 100.00 at 19% VAT, no eco fee, quantity 3, 2.5 kg per unit
        let pricing = price_line(
            dec!(100.00),
            3,
            dec!(0.19),
            &product(false, Some(dec!(2.5))),
        );

        assert_eq!(pricing.tax_amount, dec!(19.0000));
        assert_eq!(pricing.eco_fee, Decimal::ZERO);
        assert_eq!(pricing.unit_price_incl_tax, dec!(119.0000));
        assert_eq!(pricing.total_incl_tax, dec!(357.0000));
        assert_eq!(pricing.weight_kg, Some(dec!(7.5)));
    }

    #[test]
    fn eco_fee_is_five_percent_of_unit_price() {
        let pricing = price_line(dec!(50.00), 1, dec!(0.19), &product(true, None));

        assert_eq!(pricing.eco_fee, dec!(2.5000));
        assert_eq!(pricing.unit_price_incl_tax, dec!(54.0000));
        assert_eq!(pricing.total_incl_tax, dec!(54.0000));
        assert_eq!(pricing.weight_kg, None);
    }

    #[test]
    fn zero_tax_rate_leaves_price_unchanged() {
        let pricing = price_line(dec!(10), 2, Decimal::ZERO, &product(false, None));

        assert_eq!(pricing.tax_amount, Decimal::ZERO);
        assert_eq!(pricing.unit_price_incl_tax, dec!(10));
        assert_eq!(pricing.total_incl_tax, dec!(20));
    }

    #[test]
    fn line_total_matches_formula_with_eco_fee() {
        // total == (P + P*R + P*0.05) * Q
        let unit_price = dec!(33.33);
        let rate = dec!(0.19);
        let pricing = price_line(unit_price, 7, rate, &product(true, None));

        let expected = (unit_price + unit_price * rate + unit_price * dec!(0.05)) * dec!(7);
        assert_eq!(pricing.total_incl_tax, expected);
    }

    #[test]
    fn empty_line_set_aggregates_to_zero() {
        let totals = aggregate_totals(&[]);
        assert_eq!(totals.total_incl_tax, Decimal::ZERO);
        assert_eq!(totals.total_weight_kg, Decimal::ZERO);
    }

    #[test]
    fn aggregation_sums_totals_and_skips_missing_weights() {
        let lines = vec![
            line_with(dec!(357.00), Some(dec!(7.5))),
            line_with(dec!(54.00), None),
        ];

        let totals = aggregate_totals(&lines);
        assert_eq!(totals.total_incl_tax, dec!(411.00));
        assert_eq!(totals.total_weight_kg, dec!(7.5));
    }

    #[test]
    fn repeated_aggregation_is_stable() {
        let lines = vec![
            line_with(dec!(0.10), None),
            line_with(dec!(0.20), None),
            line_with(dec!(0.30), None),
        ];

        let first = aggregate_totals(&lines);
        let second = aggregate_totals(&lines);
        assert_eq!(first, second);
        assert_eq!(first.total_incl_tax, dec!(0.60));
    }
}
