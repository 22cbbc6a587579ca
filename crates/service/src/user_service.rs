use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

use models::user::{self, RegisterUserInput, Upsert, User};

use crate::errors::ServiceError;
use crate::observability::{USERS_REGISTERED_TOTAL, USERS_UPDATED_TOTAL};
use crate::storage::record_store::RecordStore;

/// Customer registration and lookup over the users collection.
pub struct UserService {
    store: RecordStore,
    // serializes read-modify-write of users.json within this process
    write_lock: Mutex<()>,
}

impl UserService {
    pub fn new(store: RecordStore) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    /// Create a user, or merge name/phone/address into the user already holding this email.
    #[instrument(skip(self, input), fields(email = ?input.email))]
    pub async fn register(&self, input: RegisterUserInput) -> Result<(User, Upsert), ServiceError> {
        input.email()?;

        let _guard = self.write_lock.lock().await;
        let mut users = self.store.load::<User>().await;
        let (user, outcome) =
            user::upsert_by_email(&mut users.records, input, || Uuid::new_v4().to_string(), Utc::now())?;
        self.store.save(&users).await?;

        match outcome {
            Upsert::Created => {
                USERS_REGISTERED_TOTAL.inc();
                info!(user_id = %user.id, email = %user.email, "user_registered");
            }
            Upsert::Updated => {
                USERS_UPDATED_TOTAL.inc();
                info!(user_id = %user.id, email = %user.email, "user_updated");
            }
        }
        Ok((user, outcome))
    }

    /// All users in insertion order.
    pub async fn list(&self) -> Vec<User> {
        self.store.read_all::<User>().await
    }

    pub async fn get(&self, id: &str) -> Result<User, ServiceError> {
        let users = self.store.read_all::<User>().await;
        user::find_by_id(&users, id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let users = self.store.read_all::<User>().await;
        user::find_by_email(&users, email).cloned()
    }
}
