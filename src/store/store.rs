use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::collection::Collection;
use super::error::{StoreError, StoreResult};
use super::records::{
    CompletionPatch, NewProduct, NewRoutine, NewRoutineCompletion, Product, ProductPatch, Routine,
    RoutineCompletion, RoutinePatch, User, UserPatch,
};

/// Document store for profiles, products, routines and completions.
///
/// Every call reads the collection file it touches, so several `Store`s on
/// the same directory see each other's writes. Errors are returned as-is;
/// there is no retry.
pub struct Store {
    root: PathBuf,
    users: Collection<User>,
    products: Collection<Product>,
    routines: Collection<Routine>,
    completions: Collection<RoutineCompletion>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Store {
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        debug!(root = %root.display(), "opened document store");

        Ok(Self {
            users: Collection::new(&root, "users"),
            products: Collection::new(&root, "products"),
            routines: Collection::new(&root, "routines"),
            completions: Collection::new(&root, "routineCompletions"),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ── Users ──

    pub fn get_user_profile(&self, user_id: &str) -> StoreResult<Option<User>> {
        self.users.get(user_id)
    }

    pub fn create_user_profile(&self, user: User) -> StoreResult<()> {
        let id = user.id.clone();
        self.users.put(&id, user)?;
        debug!(collection = self.users.name(), %id, "user profile written");
        Ok(())
    }

    pub fn update_user_profile(&self, user_id: &str, patch: UserPatch) -> StoreResult<()> {
        self.users.update(user_id, |user| patch.apply(user))
    }

    pub fn is_username_available(&self, username: &str) -> StoreResult<bool> {
        let taken = self.users.query(|user| {
            user.username
                .as_deref()
                .is_some_and(|u| u.eq_ignore_ascii_case(username))
        })?;
        Ok(taken.is_empty())
    }

    // ── Products ──

    pub fn add_product(&self, product: NewProduct) -> StoreResult<String> {
        let id = new_id();
        self.products
            .put(&id, product.into_product(id.clone(), Utc::now()))?;
        debug!(collection = self.products.name(), %id, "product added");
        Ok(id)
    }

    pub fn get_user_products(&self, user_id: &str) -> StoreResult<Vec<Product>> {
        let mut products = self.products.query(|p| p.user_id == user_id)?;
        products.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(products)
    }

    pub fn update_product(&self, product_id: &str, patch: ProductPatch) -> StoreResult<()> {
        self.products.update(product_id, |product| {
            patch.apply(product);
            product.updated_at = Utc::now();
        })
    }

    pub fn delete_product(&self, product_id: &str) -> StoreResult<()> {
        self.products.delete(product_id)
    }

    // ── Routines ──

    pub fn add_routine(&self, routine: NewRoutine) -> StoreResult<String> {
        let id = new_id();
        let now = Utc::now();
        let doc = Routine {
            id: id.clone(),
            user_id: routine.user_id,
            name: routine.name,
            kind: routine.kind,
            description: routine.description,
            steps: routine.steps,
            created_at: now,
            updated_at: now,
            is_active: true,
        };
        self.routines.put(&id, doc)?;
        debug!(collection = self.routines.name(), %id, "routine added");
        Ok(id)
    }

    pub fn get_user_routines(&self, user_id: &str) -> StoreResult<Vec<Routine>> {
        let mut routines = self.routines.query(|r| r.user_id == user_id)?;
        routines.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(routines)
    }

    pub fn update_routine(&self, routine_id: &str, patch: RoutinePatch) -> StoreResult<()> {
        self.routines.update(routine_id, |routine| {
            patch.apply(routine);
            routine.updated_at = Utc::now();
        })
    }

    pub fn delete_routine(&self, routine_id: &str) -> StoreResult<()> {
        self.routines.delete(routine_id)
    }

    // ── Routine completions ──

    pub fn add_routine_completion(&self, completion: NewRoutineCompletion) -> StoreResult<String> {
        let id = new_id();
        let now = Utc::now();
        let doc = RoutineCompletion {
            id: id.clone(),
            user_id: completion.user_id,
            routine_id: completion.routine_id,
            kind: completion.kind,
            date: completion.date,
            completed_steps: completion.completed_steps,
            created_at: now,
            updated_at: now,
        };
        self.completions.put(&id, doc)?;
        debug!(collection = self.completions.name(), %id, "routine completion added");
        Ok(id)
    }

    /// Completions for `user_id` dated within `start..=end`.
    pub fn get_routine_completions(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<RoutineCompletion>> {
        let mut completions = self
            .completions
            .query(|c| c.user_id == user_id && c.date >= start && c.date <= end)?;
        completions.sort_by(|a, b| (a.date, &a.id).cmp(&(b.date, &b.id)));
        Ok(completions)
    }

    pub fn update_routine_completion(
        &self,
        completion_id: &str,
        patch: CompletionPatch,
    ) -> StoreResult<()> {
        self.completions.update(completion_id, |completion| {
            patch.apply(completion);
            completion.updated_at = Utc::now();
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    use super::*;
    use crate::store::records::{CompletedStep, ProductStatus, RoutineStep, RoutineType};

    fn store() -> (TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    fn user(id: &str, username: Option<&str>) -> User {
        let now = Utc::now();
        User {
            id: id.into(),
            display_name: "Ada".into(),
            email: "ada@example.com".into(),
            photo_url: String::new(),
            created_at: now,
            last_login_at: now,
            user_id: id.into(),
            username: username.map(Into::into),
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 8, 0, 0).unwrap()
    }

    #[test]
    fn user_profile_lifecycle() {
        let (_dir, store) = store();
        assert_eq!(store.get_user_profile("u1").unwrap(), None);

        store.create_user_profile(user("u1", None)).unwrap();
        store
            .update_user_profile(
                "u1",
                UserPatch {
                    display_name: Some("Ada L.".into()),
                    username: Some(Some("ada".into())),
                    ..Default::default()
                },
            )
            .unwrap();

        let fetched = store.get_user_profile("u1").unwrap().unwrap();
        assert_eq!(fetched.display_name, "Ada L.");
        assert_eq!(fetched.username.as_deref(), Some("ada"));
        assert_eq!(fetched.email, "ada@example.com");
    }

    #[test]
    fn updating_missing_documents_fails() {
        let (_dir, store) = store();
        let err = store
            .update_user_profile("ghost", UserPatch::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { collection: "users", .. }));
        assert!(store.update_product("nope", ProductPatch::default()).is_err());
        assert!(store.update_routine("nope", RoutinePatch::default()).is_err());
        assert!(store
            .update_routine_completion("nope", CompletionPatch::default())
            .is_err());
    }

    #[test]
    fn username_availability_ignores_case() {
        let (_dir, store) = store();
        store.create_user_profile(user("u1", Some("Glow"))).unwrap();
        store.create_user_profile(user("u2", None)).unwrap();
        assert!(!store.is_username_available("glow").unwrap());
        assert!(store.is_username_available("glowing").unwrap());
    }

    #[test]
    fn products_are_scoped_and_updatable() {
        let (_dir, store) = store();
        let id = store
            .add_product(NewProduct {
                user_id: "u1".into(),
                name: "Toner".into(),
                brand: "Acme".into(),
                ..Default::default()
            })
            .unwrap();
        store
            .add_product(NewProduct {
                user_id: "u2".into(),
                name: "Mask".into(),
                ..Default::default()
            })
            .unwrap();

        let mine = store.get_user_products("u1").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, id);
        assert_eq!(mine[0].status, ProductStatus::Active);

        store
            .update_product(
                &id,
                ProductPatch {
                    status: Some(ProductStatus::Finished),
                    would_repurchase: Some(true),
                    notes: Some(Some("lovely".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        let updated = &store.get_user_products("u1").unwrap()[0];
        assert!(updated.would_repurchase);
        assert_eq!(updated.notes.as_deref(), Some("lovely"));
        assert!(updated.updated_at >= updated.created_at);

        store.delete_product(&id).unwrap();
        assert!(store.get_user_products("u1").unwrap().is_empty());
        // Deleting twice is fine.
        store.delete_product(&id).unwrap();
    }

    #[test]
    fn routines_start_active() {
        let (_dir, store) = store();
        let id = store
            .add_routine(NewRoutine {
                user_id: "u1".into(),
                name: "Night".into(),
                kind: RoutineType::Evening,
                description: None,
                steps: vec![RoutineStep {
                    product_id: "p1".into(),
                    order: 1,
                    notes: None,
                }],
            })
            .unwrap();

        let routines = store.get_user_routines("u1").unwrap();
        assert_eq!(routines.len(), 1);
        assert!(routines[0].is_active);

        store
            .update_routine(
                &id,
                RoutinePatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!store.get_user_routines("u1").unwrap()[0].is_active);

        store.delete_routine(&id).unwrap();
        assert!(store.get_user_routines("u1").unwrap().is_empty());
    }

    #[test]
    fn completions_filter_by_inclusive_date_range() {
        let (_dir, store) = store();
        for d in [1, 10, 20, 31] {
            store
                .add_routine_completion(NewRoutineCompletion {
                    user_id: "u1".into(),
                    routine_id: "r1".into(),
                    kind: RoutineType::Morning,
                    date: day(d),
                    completed_steps: Vec::new(),
                })
                .unwrap();
        }
        store
            .add_routine_completion(NewRoutineCompletion {
                user_id: "u2".into(),
                routine_id: "r9".into(),
                kind: RoutineType::Morning,
                date: day(10),
                completed_steps: Vec::new(),
            })
            .unwrap();

        let hits = store
            .get_routine_completions("u1", day(10), day(20))
            .unwrap();
        let dates: Vec<_> = hits.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![day(10), day(20)]);

        let id = hits[0].id.clone();
        store
            .update_routine_completion(
                &id,
                CompletionPatch {
                    date: Some(day(10) + Duration::hours(2)),
                    completed_steps: Some(vec![CompletedStep {
                        product_id: "p1".into(),
                        completed: true,
                        notes: None,
                    }]),
                },
            )
            .unwrap();
        let again = store
            .get_routine_completions("u1", day(10), day(11))
            .unwrap();
        assert_eq!(again[0].completed_steps.len(), 1);
    }

    #[test]
    fn corrupt_collection_surfaces_error() {
        let (_dir, store) = store();
        fs::write(store.root().join("products.json"), b"{ not json").unwrap();
        assert!(matches!(
            store.get_user_products("u1"),
            Err(StoreError::Serialization { .. })
        ));
    }

    #[test]
    fn stores_share_a_directory() {
        let (_dir, store) = store();
        let other = Store::open(store.root()).unwrap();
        store.create_user_profile(user("u1", Some("a"))).unwrap();
        assert!(other.get_user_profile("u1").unwrap().is_some());
    }
}
