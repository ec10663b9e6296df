use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{FieldError, UnknownField};

/// Backend-assigned product identifier. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nama_item")]
    pub name: String,
    #[serde(rename = "qty_item", serialize_with = "serialize_number")]
    pub quantity: f64,
    #[serde(rename = "kategori_item")]
    pub category: String,
    #[serde(rename = "harga_item", serialize_with = "serialize_number")]
    pub price: f64,
    #[serde(rename = "satuan_item")]
    pub unit: String,
}

impl Product {
    pub fn get(&self, field: ProductField) -> FieldValue {
        match field {
            ProductField::Name => FieldValue::Text(self.name.clone()),
            ProductField::Quantity => FieldValue::Number(self.quantity),
            ProductField::Category => FieldValue::Text(self.category.clone()),
            ProductField::Price => FieldValue::Number(self.price),
            ProductField::Unit => FieldValue::Text(self.unit.clone()),
        }
    }
}

/// The five editable product columns, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProductField {
    Name,
    Category,
    Price,
    Quantity,
    Unit,
}

impl ProductField {
    pub const ALL: [ProductField; 5] = [
        ProductField::Name,
        ProductField::Category,
        ProductField::Price,
        ProductField::Quantity,
        ProductField::Unit,
    ];

    /// Wire name used by the product backend.
    pub fn key(self) -> &'static str {
        match self {
            ProductField::Name => "nama_item",
            ProductField::Category => "kategori_item",
            ProductField::Price => "harga_item",
            ProductField::Quantity => "qty_item",
            ProductField::Unit => "satuan_item",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProductField::Name => "Nama Item",
            ProductField::Category => "Kategori",
            ProductField::Price => "Harga",
            ProductField::Quantity => "Qty",
            ProductField::Unit => "Satuan",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ProductField::Price | ProductField::Quantity)
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProductField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ProductField::ALL
            .into_iter()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| UnknownField(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Converts raw user input into the value type `field` stores.
    ///
    /// Numeric fields accept surrounding whitespace and treat empty input as
    /// zero, mirroring how an HTML number input reports a cleared box.
    pub fn coerce(field: ProductField, raw: &str) -> Result<Self, FieldError> {
        if !field.is_numeric() {
            return Ok(FieldValue::Text(raw.to_string()));
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(FieldValue::Number(0.0));
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(FieldValue::Number(value)),
            _ => Err(FieldError::NotANumber {
                field,
                raw: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{value:.0}")
            }
            FieldValue::Number(value) => write!(f, "{value}"),
        }
    }
}

fn assign_text(slot: &mut String, field: ProductField, value: FieldValue) -> Result<(), FieldError> {
    match value {
        FieldValue::Text(text) => {
            *slot = text;
            Ok(())
        }
        FieldValue::Number(_) => Err(FieldError::ExpectedText { field }),
    }
}

fn assign_number(slot: &mut f64, field: ProductField, value: FieldValue) -> Result<(), FieldError> {
    match value {
        FieldValue::Number(number) => {
            *slot = number;
            Ok(())
        }
        FieldValue::Text(raw) => match FieldValue::coerce(field, &raw)? {
            FieldValue::Number(number) => {
                *slot = number;
                Ok(())
            }
            FieldValue::Text(_) => Err(FieldError::NotANumber { field, raw }),
        },
    }
}

/// Whole numbers go out as JSON integers; integer-typed backend columns
/// reject `2500.0`.
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Partial overlay of edited values for the row being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn get(&self, field: ProductField) -> Option<FieldValue> {
        match field {
            ProductField::Name => self.name.clone().map(FieldValue::Text),
            ProductField::Quantity => self.quantity.map(FieldValue::Number),
            ProductField::Category => self.category.clone().map(FieldValue::Text),
            ProductField::Price => self.price.map(FieldValue::Number),
            ProductField::Unit => self.unit.clone().map(FieldValue::Text),
        }
    }

    pub fn set(&mut self, field: ProductField, value: FieldValue) -> Result<(), FieldError> {
        // Assign through a scratch slot so a rejected value leaves the overlay untouched.
        if field.is_numeric() {
            let mut slot = 0.0;
            assign_number(&mut slot, field, value)?;
            match field {
                ProductField::Quantity => self.quantity = Some(slot),
                _ => self.price = Some(slot),
            }
        } else {
            let mut slot = String::new();
            assign_text(&mut slot, field, value)?;
            match field {
                ProductField::Name => self.name = Some(slot),
                ProductField::Category => self.category = Some(slot),
                _ => self.unit = Some(slot),
            }
        }
        Ok(())
    }

    /// Value shown in the edit box: the override if one was typed, otherwise
    /// the stored record value.
    pub fn value_or(&self, product: &Product, field: ProductField) -> FieldValue {
        self.get(field).unwrap_or_else(|| product.get(field))
    }

    /// Merges the overlay onto `product`; overridden fields win.
    pub fn apply(&self, product: &Product) -> Product {
        Product {
            id: product.id.clone(),
            name: self.name.clone().unwrap_or_else(|| product.name.clone()),
            quantity: self.quantity.unwrap_or(product.quantity),
            category: self.category.clone().unwrap_or_else(|| product.category.clone()),
            price: self.price.unwrap_or(product.price),
            unit: self.unit.clone().unwrap_or_else(|| product.unit.clone()),
        }
    }
}

/// Field values for a product that has not been created yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "nama_item")]
    pub name: String,
    #[serde(rename = "kategori_item")]
    pub category: String,
    #[serde(rename = "harga_item", serialize_with = "serialize_number")]
    pub price: f64,
    #[serde(rename = "qty_item", serialize_with = "serialize_number")]
    pub quantity: f64,
    #[serde(rename = "satuan_item")]
    pub unit: String,
}

impl ProductDraft {
    pub fn get(&self, field: ProductField) -> FieldValue {
        match field {
            ProductField::Name => FieldValue::Text(self.name.clone()),
            ProductField::Quantity => FieldValue::Number(self.quantity),
            ProductField::Category => FieldValue::Text(self.category.clone()),
            ProductField::Price => FieldValue::Number(self.price),
            ProductField::Unit => FieldValue::Text(self.unit.clone()),
        }
    }

    pub fn set(&mut self, field: ProductField, value: FieldValue) -> Result<(), FieldError> {
        match field {
            ProductField::Name => assign_text(&mut self.name, field, value),
            ProductField::Category => assign_text(&mut self.category, field, value),
            ProductField::Unit => assign_text(&mut self.unit, field, value),
            ProductField::Quantity => assign_number(&mut self.quantity, field, value),
            ProductField::Price => assign_number(&mut self.price, field, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pen() -> Product {
        Product {
            id: ProductId("1".into()),
            name: "Pen".into(),
            quantity: 10.0,
            category: "Office".into(),
            price: 2000.0,
            unit: "pcs".into(),
        }
    }

    #[test]
    fn patch_overrides_only_touched_fields() {
        let mut patch = ProductPatch::default();
        patch
            .set(ProductField::Price, FieldValue::Number(2500.0))
            .expect("set price");

        let merged = patch.apply(&pen());
        assert_eq!(merged.price, 2500.0);
        assert_eq!(merged.name, "Pen");
        assert_eq!(merged.quantity, 10.0);
        assert_eq!(merged.id, ProductId("1".into()));
    }

    #[test]
    fn empty_text_override_still_counts_as_a_change() {
        let mut patch = ProductPatch::default();
        patch
            .set(ProductField::Unit, FieldValue::Text(String::new()))
            .expect("set unit");

        assert_eq!(patch.apply(&pen()).unit, "");
        assert!(!patch.is_empty());
    }

    #[test]
    fn numeric_coercion_rejects_garbage_and_accepts_blank() {
        assert_eq!(
            FieldValue::coerce(ProductField::Quantity, " 12 ").expect("qty"),
            FieldValue::Number(12.0)
        );
        assert_eq!(
            FieldValue::coerce(ProductField::Price, "").expect("blank"),
            FieldValue::Number(0.0)
        );
        assert!(matches!(
            FieldValue::coerce(ProductField::Price, "abc"),
            Err(FieldError::NotANumber { .. })
        ));
        assert_eq!(
            FieldValue::coerce(ProductField::Name, " Pen ").expect("text"),
            FieldValue::Text(" Pen ".into())
        );
    }

    #[test]
    fn text_fields_refuse_numbers() {
        let mut draft = ProductDraft::default();
        assert_eq!(
            draft.set(ProductField::Name, FieldValue::Number(1.0)),
            Err(FieldError::ExpectedText {
                field: ProductField::Name
            })
        );
        assert_eq!(draft, ProductDraft::default());
    }

    #[test]
    fn parses_wire_field_names() {
        assert_eq!("harga_item".parse::<ProductField>(), Ok(ProductField::Price));
        let err = "price".parse::<ProductField>().expect_err("unknown key");
        assert_eq!(err, UnknownField("price".into()));
        assert_eq!(err.to_string(), "unknown product field 'price'");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(FieldValue::Number(2000.0).to_string(), "2000");
        assert_eq!(FieldValue::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn product_uses_backend_wire_names() {
        let json = serde_json::to_value(pen()).expect("serialize");
        assert_eq!(json["nama_item"], "Pen");
        assert_eq!(json["satuan_item"], "pcs");
        assert_eq!(json["id"], "1");
        assert_eq!(json["qty_item"], serde_json::json!(10));
        assert_eq!(json["harga_item"], serde_json::json!(2000));

        let parsed: Product = serde_json::from_value(serde_json::json!({
            "id": "9",
            "nama_item": "Ink",
            "qty_item": 3,
            "kategori_item": "Office",
            "harga_item": 1500,
            "satuan_item": "btl",
            "created_at": "ignored"
        }))
        .expect("deserialize");
        assert_eq!(parsed.quantity, 3.0);
        assert_eq!(parsed.id, ProductId("9".into()));
    }

    #[test]
    fn whole_numbers_serialize_as_integers() {
        let body = serde_json::to_string(&ProductDraft::default()).expect("serialize");
        assert!(body.contains("\"harga_item\":0,"), "{body}");
        assert!(body.contains("\"qty_item\":0,"), "{body}");

        let half = Product {
            price: 2.5,
            ..pen()
        };
        let json = serde_json::to_value(half).expect("serialize");
        assert_eq!(json["harga_item"], serde_json::json!(2.5));
    }
}
