use chrono::NaiveDate;

/// Possible errors to occur when recording a purchase
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    #[error("The {0} should be at least 3 characters long")]
    NameTooShort(&'static str),
    #[error("The {0} must be a non-negative number")]
    InvalidAmount(&'static str),
    #[error("At least one unit has to be bought")]
    ZeroQuantity,
}

/// A single purchase of one or more units of an item
///
/// Purchases are immutable once recorded. Prices and the weight are given per
/// unit, the shipping fee applies to every unit as well.
///
/// Deserialized purchases go through [`Purchase::new`] as well, so a document
/// with an invalid purchase fails to load.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PurchaseRecord")]
pub struct Purchase {
    seller: String,
    date: NaiveDate,
    item_name: String,
    cost: f64,
    shipping: f64,
    weight: f64,
    quantity: u32,
}

impl Purchase {
    /// Creates a new purchase and checks that all of its fields make sense
    pub fn new(
        seller: impl Into<String>,
        date: NaiveDate,
        item_name: impl Into<String>,
        cost: f64,
        shipping: f64,
        weight: f64,
        quantity: u32,
    ) -> Result<Self, PurchaseError> {
        let seller = check_name("seller name", seller.into())?;
        let item_name = check_name("item name", item_name.into())?;
        check_amount("cost", cost)?;
        check_amount("shipping fee", shipping)?;
        check_amount("weight", weight)?;
        if quantity == 0 {
            return Err(PurchaseError::ZeroQuantity);
        }

        Ok(Self {
            seller,
            date,
            item_name,
            cost,
            shipping,
            weight,
            quantity,
        })
    }

    /// Where the purchase was made
    pub fn seller(&self) -> &str {
        &self.seller
    }

    /// The day of the purchase
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The name of the bought item
    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    /// Cost of one unit
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Shipping fee of one unit
    pub fn shipping(&self) -> f64 {
        self.shipping
    }

    /// Weight of one unit in kg
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Number of bought units
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The total cost of all units, including shipping
    pub fn total_cost(&self) -> f64 {
        (self.cost + self.shipping) * f64::from(self.quantity)
    }

    /// The total weight of all units
    pub fn total_weight(&self) -> f64 {
        self.weight * f64::from(self.quantity)
    }
}

/// A purchase as stored on disk, before its fields are checked
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseRecord {
    seller: String,
    date: NaiveDate,
    item_name: String,
    cost: f64,
    shipping: f64,
    weight: f64,
    quantity: u32,
}

impl TryFrom<PurchaseRecord> for Purchase {
    type Error = PurchaseError;

    fn try_from(record: PurchaseRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.seller,
            record.date,
            record.item_name,
            record.cost,
            record.shipping,
            record.weight,
            record.quantity,
        )
    }
}

fn check_name(field: &'static str, name: String) -> Result<String, PurchaseError> {
    let name = name.trim();
    match name.chars().count() >= 3 {
        true => Ok(name.to_string()),
        false => Err(PurchaseError::NameTooShort(field)),
    }
}

fn check_amount(field: &'static str, amount: f64) -> Result<(), PurchaseError> {
    match amount.is_finite() && amount >= 0. {
        true => Ok(()),
        false => Err(PurchaseError::InvalidAmount(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    #[test]
    fn totals_include_shipping_per_unit() {
        let purchase = Purchase::new("Shop", date(), "Box", 10., 2., 1.5, 2).unwrap();
        assert_eq!(purchase.total_cost(), 24.);
        assert_eq!(purchase.total_weight(), 3.);
    }

    #[test]
    fn names_are_trimmed_and_checked() {
        let purchase = Purchase::new("  Shop ", date(), "Box\n", 1., 0., 0., 1).unwrap();
        assert_eq!(purchase.seller(), "Shop");
        assert_eq!(purchase.item_name(), "Box");

        assert_eq!(
            Purchase::new(" ab ", date(), "Box", 1., 0., 0., 1),
            Err(PurchaseError::NameTooShort("seller name")),
        );
        assert_eq!(
            Purchase::new("Shop", date(), "", 1., 0., 0., 1),
            Err(PurchaseError::NameTooShort("item name")),
        );
    }

    #[test]
    fn rejects_invalid_numbers() {
        assert_eq!(
            Purchase::new("Shop", date(), "Box", -1., 0., 0., 1),
            Err(PurchaseError::InvalidAmount("cost")),
        );
        assert_eq!(
            Purchase::new("Shop", date(), "Box", 1., f64::NAN, 0., 1),
            Err(PurchaseError::InvalidAmount("shipping fee")),
        );
        assert_eq!(
            Purchase::new("Shop", date(), "Box", 1., 0., f64::INFINITY, 1),
            Err(PurchaseError::InvalidAmount("weight")),
        );
        assert_eq!(
            Purchase::new("Shop", date(), "Box", 1., 0., 0., 0),
            Err(PurchaseError::ZeroQuantity),
        );
    }

    #[test]
    fn serializes_with_camel_case_and_iso_date() {
        let purchase = Purchase::new("Shop", date(), "Box", 10., 2., 1., 2).unwrap();
        assert_eq!(
            serde_json::to_string(&purchase).unwrap(),
            r#"{"seller":"Shop","date":"2023-01-01","itemName":"Box","cost":10.0,"shipping":2.0,"weight":1.0,"quantity":2}"#,
        );
    }

    #[test]
    fn deserializing_checks_fields() {
        let purchase: Purchase = serde_json::from_str(
            r#"{"seller":"Shop","date":"2023-01-01","itemName":"Box","cost":10.0,"shipping":2.0,"weight":1.0,"quantity":2}"#,
        )
        .unwrap();
        assert_eq!(purchase, Purchase::new("Shop", date(), "Box", 10., 2., 1., 2).unwrap());

        for invalid in [
            r#"{"seller":"","date":"2023-01-01","itemName":"Box","cost":10.0,"shipping":2.0,"weight":1.0,"quantity":2}"#,
            r#"{"seller":"Shop","date":"2023-01-01","itemName":"Box","cost":-10.0,"shipping":2.0,"weight":1.0,"quantity":2}"#,
            r#"{"seller":"Shop","date":"2023-01-01","itemName":"Box","cost":10.0,"shipping":2.0,"weight":-1.0,"quantity":2}"#,
            r#"{"seller":"Shop","date":"2023-01-01","itemName":"Box","cost":10.0,"shipping":2.0,"weight":1.0,"quantity":0}"#,
        ] {
            assert!(serde_json::from_str::<Purchase>(invalid).is_err(), "{invalid} should be rejected");
        }
    }
}
