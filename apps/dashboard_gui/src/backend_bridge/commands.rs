//! Backend commands queued from UI to backend worker.

use shared::domain::{Product, ProductDraft, ProductId};

pub enum BackendCommand {
    LoadProducts,
    CreateProduct { draft: ProductDraft },
    UpdateProduct { product: Product },
    DeleteProduct { id: ProductId },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadProducts => "load_products",
            BackendCommand::CreateProduct { .. } => "create_product",
            BackendCommand::UpdateProduct { .. } => "update_product",
            BackendCommand::DeleteProduct { .. } => "delete_product",
        }
    }
}
