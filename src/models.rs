// src/models.rs
use serde::{Deserialize, Serialize};

/// A single catalog listing. Ids are small monotone integers assigned by the
/// catalog, never reused within one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
}

/// The transient form record mirrored by the editor modal. Empty for the add
/// flow, populated from the selected product for the edit flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: i64,
}

impl ProductDraft {
    pub fn from_product(product: &Product) -> Self {
        ProductDraft {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
        }
    }

    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }
}

// --- PAYLOAD STRUCTS FOR THE EDITOR HANDLERS ---

/// Fields posted by the modal form on submit. Field values are taken as-is;
/// only structurally untypable input (a non-numeric price) is rejected, at
/// the deserialization boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductFormData {
    pub name: String,
    pub description: String,
    pub price: i64,
}

impl From<ProductFormData> for ProductDraft {
    fn from(form: ProductFormData) -> Self {
        ProductDraft {
            name: form.name,
            description: form.description,
            price: form.price,
        }
    }
}

// --- API RESPONSE STRUCTS ---

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub total_items: usize,
    pub data: Vec<Product>,
}

/// The three listings every fresh catalog starts with.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "Dental X-Ray Unit".to_string(),
            description: "A used dental x-ray unit in good condition.".to_string(),
            price: 2500,
        },
        Product {
            id: 2,
            name: "Dental Chair".to_string(),
            description: "A used dental chair in good condition.".to_string(),
            price: 1500,
        },
        Product {
            id: 3,
            name: "Dental Light".to_string(),
            description: "A used dental light in good condition.".to_string(),
            price: 500,
        },
    ]
}
