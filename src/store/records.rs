use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub username: Option<Option<String>>,
}

impl UserPatch {
    pub(crate) fn apply(self, user: &mut User) {
        if let Some(v) = self.display_name {
            user.display_name = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.photo_url {
            user.photo_url = v;
        }
        if let Some(v) = self.last_login_at {
            user.last_login_at = v;
        }
        if let Some(v) = self.username {
            user.username = v;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub brand: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub size: Option<String>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: ProductStatus,
    pub would_repurchase: bool,
}

/// Input to `Store::add_product`; the store assigns id and timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProduct {
    pub user_id: String,
    pub name: String,
    pub brand: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub size: Option<String>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub status: Option<ProductStatus>,
    pub would_repurchase: bool,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

impl NewProduct {
    /// Empty strings and zero price/rating are stored as absent, and only a
    /// finished product can be marked for repurchase.
    pub(crate) fn into_product(self, id: String, now: DateTime<Utc>) -> Product {
        let status = self.status.unwrap_or_default();
        Product {
            id,
            user_id: self.user_id,
            name: self.name,
            brand: self.brand,
            category: non_empty(self.category),
            description: non_empty(self.description),
            ingredients: self.ingredients,
            image_url: non_empty(self.image_url),
            purchase_date: self.purchase_date,
            expiry_date: self.expiry_date,
            price: self.price.filter(|p| *p != 0.0),
            size: non_empty(self.size),
            rating: self.rating.filter(|r| *r != 0),
            notes: non_empty(self.notes),
            created_at: now,
            updated_at: now,
            status,
            would_repurchase: status == ProductStatus::Finished && self.would_repurchase,
        }
    }
}

/// Partial product update. Outer `None` leaves a field untouched; for
/// optional fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub ingredients: Option<Option<Vec<String>>>,
    pub image_url: Option<Option<String>>,
    pub purchase_date: Option<Option<DateTime<Utc>>>,
    pub expiry_date: Option<Option<DateTime<Utc>>>,
    pub price: Option<Option<f64>>,
    pub size: Option<Option<String>>,
    pub rating: Option<Option<u8>>,
    pub notes: Option<Option<String>>,
    pub status: Option<ProductStatus>,
    pub would_repurchase: Option<bool>,
}

macro_rules! patch_fields {
    ($patch:expr, $target:expr; $($field:ident),* $(,)?) => {
        $(
            if let Some(v) = $patch.$field {
                $target.$field = v;
            }
        )*
    };
}

impl ProductPatch {
    pub(crate) fn apply(self, product: &mut Product) {
        patch_fields!(self, product;
            name, brand, category, description, ingredients, image_url,
            purchase_date, expiry_date, price, size, rating, notes, status,
            would_repurchase,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineType {
    Morning,
    Evening,
    Weekly,
    Custom,
}

impl RoutineType {
    pub fn key(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
            Self::Weekly => "weekly",
            Self::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Evening => "Evening",
            Self::Weekly => "Weekly",
            Self::Custom => "Custom",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Morning => "#f59e0b",
            Self::Evening => "#6366f1",
            Self::Weekly => "#10b981",
            Self::Custom => "#ec4899",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineStep {
    pub product_id: String,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RoutineType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<RoutineStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRoutine {
    pub user_id: String,
    pub name: String,
    pub kind: RoutineType,
    pub description: Option<String>,
    pub steps: Vec<RoutineStep>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutinePatch {
    pub name: Option<String>,
    pub kind: Option<RoutineType>,
    pub description: Option<Option<String>>,
    pub steps: Option<Vec<RoutineStep>>,
    pub is_active: Option<bool>,
}

impl RoutinePatch {
    pub(crate) fn apply(self, routine: &mut Routine) {
        patch_fields!(self, routine; name, kind, description, steps, is_active);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedStep {
    pub product_id: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineCompletion {
    pub id: String,
    pub user_id: String,
    pub routine_id: String,
    #[serde(rename = "type")]
    pub kind: RoutineType,
    pub date: DateTime<Utc>,
    pub completed_steps: Vec<CompletedStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoutineCompletion {
    /// A completion with no recorded steps counts as done.
    pub fn is_done(&self) -> bool {
        self.completed_steps.iter().all(|s| s.completed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRoutineCompletion {
    pub user_id: String,
    pub routine_id: String,
    pub kind: RoutineType,
    pub date: DateTime<Utc>,
    pub completed_steps: Vec<CompletedStep>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionPatch {
    pub date: Option<DateTime<Utc>>,
    pub completed_steps: Option<Vec<CompletedStep>>,
}

impl CompletionPatch {
    pub(crate) fn apply(self, completion: &mut RoutineCompletion) {
        patch_fields!(self, completion; date, completed_steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_normalises_empty_values() {
        let now = Utc::now();
        let product = NewProduct {
            user_id: "u1".into(),
            name: "Cleanser".into(),
            brand: "Acme".into(),
            category: Some(String::new()),
            notes: Some("gentle".into()),
            price: Some(0.0),
            rating: Some(0),
            would_repurchase: true,
            ..Default::default()
        }
        .into_product("p1".into(), now);

        assert_eq!(product.category, None);
        assert_eq!(product.notes.as_deref(), Some("gentle"));
        assert_eq!(product.price, None);
        assert_eq!(product.rating, None);
        assert_eq!(product.status, ProductStatus::Active);
        assert!(!product.would_repurchase);
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn finished_product_keeps_repurchase_flag() {
        let product = NewProduct {
            status: Some(ProductStatus::Finished),
            would_repurchase: true,
            price: Some(12.5),
            ..Default::default()
        }
        .into_product("p2".into(), Utc::now());
        assert!(product.would_repurchase);
        assert_eq!(product.price, Some(12.5));
    }

    #[test]
    fn routine_serialises_with_document_field_names() {
        let routine = Routine {
            id: "r1".into(),
            user_id: "u1".into(),
            name: "AM".into(),
            kind: RoutineType::Morning,
            description: None,
            steps: vec![RoutineStep {
                product_id: "p1".into(),
                order: 1,
                notes: None,
            }],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_active: true,
        };
        let json = serde_json::to_value(&routine).unwrap();
        assert_eq!(json["type"], "morning");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["steps"][0]["productId"], "p1");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn completion_done_when_all_steps_complete() {
        let mut completion = RoutineCompletion {
            id: "c1".into(),
            user_id: "u1".into(),
            routine_id: "r1".into(),
            kind: RoutineType::Evening,
            date: Utc::now(),
            completed_steps: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(completion.is_done());
        completion.completed_steps.push(CompletedStep {
            product_id: "p1".into(),
            completed: false,
            notes: None,
        });
        assert!(!completion.is_done());
    }
}
