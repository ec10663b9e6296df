use serde::{Deserialize, Serialize};

use crate::domain::Product;

/// Body of `GET <base>/items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsEnvelope {
    pub data: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_envelope_preserves_backend_order() {
        let envelope: ItemsEnvelope = serde_json::from_str(
            r#"{"data":[
                {"id":"b","nama_item":"B","qty_item":1,"kategori_item":"x","harga_item":1,"satuan_item":"u"},
                {"id":"a","nama_item":"A","qty_item":2,"kategori_item":"y","harga_item":2,"satuan_item":"v"}
            ]}"#,
        )
        .expect("parse envelope");

        let ids: Vec<_> = envelope.data.iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn empty_items_list_is_valid() {
        let envelope: ItemsEnvelope = serde_json::from_str(r#"{"data":[]}"#).expect("parse");
        assert!(envelope.data.is_empty());
    }
}
