pub mod error;
pub mod models;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use error::{Result, StoreError};
pub use models::{
    Account, Database, Department, Employee, Request, RequestItem, RequestStatus, RequestType,
    Role,
};
pub use storage::{
    data_dir, DurableStore, FileStore, MemoryStore, AUTH_TOKEN_KEY, SNAPSHOT_KEY,
    UNVERIFIED_EMAIL_KEY,
};
pub use store::{RecordStore, Session};
