//! In-memory product backend for state machine tests.

use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use reqwest::Method;
use shared::domain::{Product, ProductDraft, ProductId};

use crate::{ApiRequestError, ProductApi};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ApiCall {
    List,
    Create(ProductDraft),
    Update(Product),
    Delete(ProductId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
pub(crate) struct FakeProductApi {
    products: Mutex<Vec<Product>>,
    calls: Mutex<Vec<ApiCall>>,
    failing: Mutex<HashSet<Op>>,
    next_id: Mutex<u32>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("fake api lock")
}

impl FakeProductApi {
    pub(crate) fn with_products(products: Vec<Product>) -> Self {
        let api = Self::default();
        *lock(&api.next_id) = products.len() as u32 + 1;
        *lock(&api.products) = products;
        api
    }

    pub(crate) fn fail(&self, op: Op) {
        lock(&self.failing).insert(op);
    }

    pub(crate) fn recover(&self, op: Op) {
        lock(&self.failing).remove(&op);
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    pub(crate) fn stored(&self) -> Vec<Product> {
        lock(&self.products).clone()
    }

    fn enter(&self, call: ApiCall, op: Op, method: Method) -> Result<(), ApiRequestError> {
        lock(&self.calls).push(call);
        if lock(&self.failing).contains(&op) {
            return Err(ApiRequestError::Status {
                method,
                url: "http://fake/api/product/items".into(),
                status: 500,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ProductApi for FakeProductApi {
    async fn list_items(&self) -> Result<Vec<Product>, ApiRequestError> {
        self.enter(ApiCall::List, Op::List, Method::GET)?;
        Ok(self.stored())
    }

    async fn create_item(&self, draft: &ProductDraft) -> Result<Product, ApiRequestError> {
        self.enter(ApiCall::Create(draft.clone()), Op::Create, Method::POST)?;
        let mut next_id = lock(&self.next_id);
        let created = Product {
            id: ProductId(next_id.to_string()),
            name: draft.name.clone(),
            quantity: draft.quantity,
            category: draft.category.clone(),
            price: draft.price,
            unit: draft.unit.clone(),
        };
        *next_id += 1;
        lock(&self.products).push(created.clone());
        Ok(created)
    }

    async fn update_item(&self, product: &Product) -> Result<(), ApiRequestError> {
        self.enter(ApiCall::Update(product.clone()), Op::Update, Method::PUT)?;
        let mut products = lock(&self.products);
        if let Some(stored) = products.iter_mut().find(|p| p.id == product.id) {
            *stored = product.clone();
        }
        Ok(())
    }

    async fn delete_item(&self, id: &ProductId) -> Result<(), ApiRequestError> {
        self.enter(ApiCall::Delete(id.clone()), Op::Delete, Method::DELETE)?;
        lock(&self.products).retain(|p| &p.id != id);
        Ok(())
    }
}

pub(crate) fn product(id: &str, name: &str, quantity: f64, price: f64) -> Product {
    Product {
        id: ProductId(id.into()),
        name: name.into(),
        quantity,
        category: "Office".into(),
        price,
        unit: "pcs".into(),
    }
}

pub(crate) fn pen() -> Product {
    product("1", "Pen", 10.0, 2000.0)
}
