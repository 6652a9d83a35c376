use chrono::Local;
use log::warn;

use crate::error::{Result, StoreError};
use crate::models::{
    Account, Database, Department, Employee, Request, RequestItem, RequestStatus, RequestType,
    Role,
};
use crate::storage::{
    load_snapshot, save_snapshot, DurableStore, AUTH_TOKEN_KEY, UNVERIFIED_EMAIL_KEY,
};

/// The currently authenticated account, held in volatile memory only.
/// Never persisted; restored on open by re-validating the remember-me
/// token against the account collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub account_id: u32,
    pub email: String,
    pub role: Role,
}

/// Owns the four collections and the session pointer.
///
/// Every successful mutation is followed by a snapshot write. A failed
/// write is logged and swallowed: the in-memory state stays correct for
/// the rest of the session even if durability is uncertain.
pub struct RecordStore {
    db: Database,
    backend: Box<dyn DurableStore>,
    session: Option<Session>,
}

impl RecordStore {
    /// Opens the store against a durable backend.
    ///
    /// Missing or malformed snapshot data yields the seed data set,
    /// persisted immediately. Never fails; corrupt data is treated as
    /// absent data. A remember-me token that no longer matches a
    /// verified account is silently discarded.
    pub fn open(backend: Box<dyn DurableStore>) -> Self {
        let db = match load_snapshot(backend.as_ref()) {
            Ok(Some(db)) => db,
            Ok(None) => {
                let db = Database::seed();
                if let Err(e) = save_snapshot(backend.as_ref(), &db) {
                    warn!("Failed to persist seed snapshot: {:#}", e);
                }
                db
            }
            Err(e) => {
                warn!("Discarding unreadable snapshot: {:#}", e);
                let db = Database::seed();
                if let Err(e) = save_snapshot(backend.as_ref(), &db) {
                    warn!("Failed to persist seed snapshot: {:#}", e);
                }
                db
            }
        };

        let mut store = Self {
            db,
            backend,
            session: None,
        };
        store.restore_session();
        store
    }

    fn restore_session(&mut self) {
        let token = match self.backend.get(AUTH_TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to read auth token: {:#}", e);
                return;
            }
        };

        match self.db.account_by_email(&token) {
            Some(account) if account.verified => {
                self.session = Some(Session {
                    account_id: account.id,
                    email: account.email.clone(),
                    role: account.role,
                });
            }
            _ => {
                // Stale token: discard without surfacing anything
                if let Err(e) = self.backend.remove(AUTH_TOKEN_KEY) {
                    warn!("Failed to clear stale auth token: {:#}", e);
                }
            }
        }
    }

    /// Writes the full snapshot; failure is logged and swallowed
    fn persist(&self) {
        if let Err(e) = save_snapshot(self.backend.as_ref(), &self.db) {
            warn!("Failed to persist snapshot: {:#}", e);
        }
    }

    fn put_key(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.put(key, value) {
            warn!("Failed to write {}: {:#}", key, e);
        }
    }

    fn remove_key(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            warn!("Failed to remove {}: {:#}", key, e);
        }
    }

    // =========================================================================
    // Session & authentication
    // =========================================================================

    /// Returns the active session, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// True when the active session has the admin role
    pub fn is_admin(&self) -> bool {
        matches!(
            self.session,
            Some(Session {
                role: Role::Admin,
                ..
            })
        )
    }

    fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(StoreError::NotAuthenticated)
    }

    fn require_admin(&self) -> Result<&Session> {
        let session = self.require_session()?;
        if session.role != Role::Admin {
            return Err(StoreError::NotAdmin);
        }
        Ok(session)
    }

    /// Registers a new unverified user-role account and tracks the
    /// email as awaiting verification.
    pub fn register(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Account> {
        if self.db.account_by_email(email).is_some() {
            return Err(StoreError::DuplicateEmail);
        }

        let account = Account {
            id: self.db.next_account_id(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::User,
            verified: false,
        };
        self.db.accounts.push(account.clone());
        self.persist();

        self.put_key(UNVERIFIED_EMAIL_KEY, email);

        Ok(account)
    }

    /// Completes the pending verification flow, marking the tracked
    /// account as verified. Returns the verified email.
    pub fn verify_pending_email(&mut self) -> Result<String> {
        let email = match self.backend.get(UNVERIFIED_EMAIL_KEY) {
            Ok(Some(email)) => email,
            Ok(None) => return Err(StoreError::NoPendingVerification),
            Err(e) => {
                warn!("Failed to read pending verification: {:#}", e);
                return Err(StoreError::NoPendingVerification);
            }
        };

        if self.db.account_by_email(&email).is_none() {
            // The tracked account was deleted out from under the flow
            self.remove_key(UNVERIFIED_EMAIL_KEY);
            return Err(StoreError::NoPendingVerification);
        }

        if let Some(account) = self.db.account_by_email_mut(&email) {
            account.verified = true;
        }
        self.persist();
        self.remove_key(UNVERIFIED_EMAIL_KEY);

        Ok(email)
    }

    /// Authenticates against email, password and the verified flag.
    /// On success establishes the session and stores the remember-me
    /// token.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Account> {
        let account = self
            .db
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password && a.verified)
            .ok_or(StoreError::InvalidCredentials)?
            .clone();

        self.session = Some(Session {
            account_id: account.id,
            email: account.email.clone(),
            role: account.role,
        });
        self.put_key(AUTH_TOKEN_KEY, &account.email);

        Ok(account)
    }

    /// Clears the session and the remember-me token. No snapshot write;
    /// session state is not part of the snapshot.
    pub fn logout(&mut self) {
        self.session = None;
        self.remove_key(AUTH_TOKEN_KEY);
    }

    // =========================================================================
    // Accounts (admin)
    // =========================================================================

    /// Lists all accounts
    pub fn accounts(&self) -> &[Account] {
        &self.db.accounts
    }

    pub fn create_account(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        role: Role,
        verified: bool,
    ) -> Result<Account> {
        self.require_admin()?;

        if self.db.account_by_email(email).is_some() {
            return Err(StoreError::DuplicateEmail);
        }

        let account = Account {
            id: self.db.next_account_id(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
            verified,
        };
        self.db.accounts.push(account.clone());
        self.persist();

        Ok(account)
    }

    /// Updates an account. An empty `password` keeps the existing one;
    /// that is deliberate field semantics, not an error.
    pub fn update_account(
        &mut self,
        id: u32,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        role: Role,
        verified: bool,
    ) -> Result<Account> {
        self.require_admin()?;

        if self
            .db
            .accounts
            .iter()
            .any(|a| a.email == email && a.id != id)
        {
            return Err(StoreError::DuplicateEmail);
        }

        let account = self
            .db
            .account_by_id_mut(id)
            .ok_or(StoreError::not_found("Account", id))?;

        account.first_name = first_name.to_string();
        account.last_name = last_name.to_string();
        account.email = email.to_string();
        if !password.is_empty() {
            account.password = password.to_string();
        }
        account.role = role;
        account.verified = verified;
        let updated = account.clone();

        // Keep the session view of the edited account current
        if let Some(session) = &mut self.session {
            if session.account_id == id {
                session.email = updated.email.clone();
                session.role = updated.role;
            }
        }

        self.persist();
        Ok(updated)
    }

    /// Deletes an account. The session account cannot delete itself.
    /// Employee rows referencing the account are left dangling.
    pub fn delete_account(&mut self, id: u32) -> Result<()> {
        let session = self.require_admin()?;
        if session.account_id == id {
            return Err(StoreError::SelfDeletion);
        }

        if self.db.account_by_id(id).is_none() {
            return Err(StoreError::not_found("Account", id));
        }

        self.db.accounts.retain(|a| a.id != id);
        self.persist();
        Ok(())
    }

    pub fn reset_password(&mut self, id: u32, new_password: &str) -> Result<()> {
        self.require_admin()?;

        if new_password.len() < 6 {
            return Err(StoreError::PasswordTooShort);
        }

        let account = self
            .db
            .account_by_id_mut(id)
            .ok_or(StoreError::not_found("Account", id))?;
        account.password = new_password.to_string();

        self.persist();
        Ok(())
    }

    // =========================================================================
    // Departments (admin)
    // =========================================================================

    /// Lists all departments
    pub fn departments(&self) -> &[Department] {
        &self.db.departments
    }

    pub fn department(&self, id: u32) -> Option<&Department> {
        self.db.department_by_id(id)
    }

    pub fn create_department(&mut self, name: &str, description: &str) -> Result<Department> {
        self.require_admin()?;

        let department = Department {
            id: self.db.next_department_id(),
            name: name.to_string(),
            description: description.to_string(),
        };
        self.db.departments.push(department.clone());
        self.persist();

        Ok(department)
    }

    pub fn update_department(
        &mut self,
        id: u32,
        name: &str,
        description: &str,
    ) -> Result<Department> {
        self.require_admin()?;

        let department = self
            .db
            .department_by_id_mut(id)
            .ok_or(StoreError::not_found("Department", id))?;
        department.name = name.to_string();
        department.description = description.to_string();
        let updated = department.clone();

        self.persist();
        Ok(updated)
    }

    /// Deletes a department. Employee rows referencing it are left
    /// dangling.
    pub fn delete_department(&mut self, id: u32) -> Result<()> {
        self.require_admin()?;

        if self.db.department_by_id(id).is_none() {
            return Err(StoreError::not_found("Department", id));
        }

        self.db.departments.retain(|d| d.id != id);
        self.persist();
        Ok(())
    }

    // =========================================================================
    // Employees (admin)
    // =========================================================================

    /// Lists all employees
    pub fn employees(&self) -> &[Employee] {
        &self.db.employees
    }

    pub fn create_employee(
        &mut self,
        employee_id: &str,
        user_id: u32,
        department_id: u32,
        position: &str,
        hire_date: chrono::NaiveDate,
    ) -> Result<Employee> {
        self.require_admin()?;

        let employee = Employee {
            id: self.db.next_employee_id(),
            employee_id: employee_id.to_string(),
            user_id,
            department_id,
            position: position.to_string(),
            hire_date,
        };
        self.db.employees.push(employee.clone());
        self.persist();

        Ok(employee)
    }

    pub fn update_employee(
        &mut self,
        id: u32,
        employee_id: &str,
        user_id: u32,
        department_id: u32,
        position: &str,
        hire_date: chrono::NaiveDate,
    ) -> Result<Employee> {
        self.require_admin()?;

        let employee = self
            .db
            .employee_by_id_mut(id)
            .ok_or(StoreError::not_found("Employee", id))?;
        employee.employee_id = employee_id.to_string();
        employee.user_id = user_id;
        employee.department_id = department_id;
        employee.position = position.to_string();
        employee.hire_date = hire_date;
        let updated = employee.clone();

        self.persist();
        Ok(updated)
    }

    pub fn delete_employee(&mut self, id: u32) -> Result<()> {
        self.require_admin()?;

        if self.db.employee_by_id(id).is_none() {
            return Err(StoreError::not_found("Employee", id));
        }

        self.db.employees.retain(|e| e.id != id);
        self.persist();
        Ok(())
    }

    /// Looks up the account referenced by an employee row, if it still
    /// exists (deletes may leave the reference dangling)
    pub fn account_for_employee(&self, employee: &Employee) -> Option<&Account> {
        self.db.account_by_id(employee.user_id)
    }

    /// Looks up the department referenced by an employee row, if it
    /// still exists
    pub fn department_for_employee(&self, employee: &Employee) -> Option<&Department> {
        self.db.department_by_id(employee.department_id)
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Submits a request for the current session. Incomplete item rows
    /// (blank name or zero quantity) are dropped before validation.
    pub fn create_request(
        &mut self,
        request_type: Option<RequestType>,
        items: Vec<RequestItem>,
    ) -> Result<Request> {
        let session = self.require_session()?;
        let employee_email = session.email.clone();

        let request_type = request_type.ok_or(StoreError::MissingType)?;

        let items: Vec<RequestItem> = items
            .into_iter()
            .filter(|item| !item.name.trim().is_empty() && item.quantity >= 1)
            .collect();
        if items.is_empty() {
            return Err(StoreError::NoItems);
        }

        let request = Request {
            id: self.db.next_request_id(),
            request_type,
            items,
            status: RequestStatus::Pending,
            date: Local::now().date_naive(),
            employee_email,
        };
        self.db.requests.push(request.clone());
        self.persist();

        Ok(request)
    }

    /// Requests visible to the current session: admins see all,
    /// everyone else only requests carrying their own email. A
    /// read-time filter, not a storage partition.
    pub fn requests_visible(&self) -> Result<Vec<&Request>> {
        let session = self.require_session()?;

        let visible = if session.role == Role::Admin {
            self.db.requests.iter().collect()
        } else {
            self.db
                .requests
                .iter()
                .filter(|r| r.employee_email == session.email)
                .collect()
        };

        Ok(visible)
    }

    /// Approves or rejects a pending request. Terminal states are
    /// never re-transitioned.
    pub fn update_request_status(&mut self, id: u32, new_status: RequestStatus) -> Result<()> {
        self.require_admin()?;

        let request = self
            .db
            .request_by_id_mut(id)
            .ok_or(StoreError::not_found("Request", id))?;

        if request.status != RequestStatus::Pending {
            return Err(StoreError::AlreadyResolved {
                status: request.status,
            });
        }

        request.status = new_status;
        self.persist();
        Ok(())
    }

    pub fn delete_request(&mut self, id: u32) -> Result<()> {
        self.require_admin()?;

        if self.db.request_by_id(id).is_none() {
            return Err(StoreError::not_found("Request", id));
        }

        self.db.requests.retain(|r| r.id != id);
        self.persist();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SNAPSHOT_KEY};

    fn open_memory() -> RecordStore {
        RecordStore::open(Box::new(MemoryStore::new()))
    }

    fn open_admin() -> RecordStore {
        let mut store = open_memory();
        store.login("admin@example.com", "Password123!").unwrap();
        store
    }

    fn item(name: &str, quantity: u32) -> RequestItem {
        RequestItem {
            name: name.into(),
            quantity,
        }
    }

    /// Registers and verifies a user account, leaving the admin
    /// session active
    fn add_verified_user(store: &mut RecordStore, email: &str) {
        store.register("Test", "User", email, "secret1").unwrap();
        store.verify_pending_email().unwrap();
    }

    #[test]
    fn test_open_seeds_when_empty() {
        let store = open_memory();

        assert_eq!(store.accounts().len(), 1);
        assert_eq!(store.departments().len(), 2);
        assert!(store.session().is_none());
    }

    #[test]
    fn test_open_seeds_on_corrupt_snapshot() {
        let backend = MemoryStore::new();
        backend.put(SNAPSHOT_KEY, "{definitely not json").unwrap();

        let store = RecordStore::open(Box::new(backend));

        assert_eq!(store.accounts().len(), 1);
        assert_eq!(store.accounts()[0].email, "admin@example.com");
    }

    #[test]
    fn test_open_restores_session_from_token() {
        let backend = MemoryStore::new();
        save_snapshot(&backend, &Database::seed()).unwrap();
        backend.put(AUTH_TOKEN_KEY, "admin@example.com").unwrap();

        let store = RecordStore::open(Box::new(backend));

        let session = store.session().expect("session restored from token");
        assert_eq!(session.email, "admin@example.com");
        assert_eq!(session.role, Role::Admin);
    }

    #[test]
    fn test_open_discards_stale_token() {
        let backend = MemoryStore::new();
        save_snapshot(&backend, &Database::seed()).unwrap();
        backend.put(AUTH_TOKEN_KEY, "ghost@example.com").unwrap();

        let store = RecordStore::open(Box::new(backend));

        assert!(store.session().is_none());
    }

    #[test]
    fn test_register_duplicate_email() {
        let mut store = open_memory();

        store
            .register("Jane", "Doe", "jane@example.com", "secret1")
            .unwrap();
        let before = store.accounts().len();

        let result = store.register("Other", "Jane", "jane@example.com", "secret2");

        assert_eq!(result, Err(StoreError::DuplicateEmail));
        assert_eq!(store.accounts().len(), before);
    }

    #[test]
    fn test_register_creates_unverified_user() {
        let mut store = open_memory();

        let account = store
            .register("Jane", "Doe", "jane@example.com", "secret1")
            .unwrap();

        assert_eq!(account.role, Role::User);
        assert!(!account.verified);
        assert_eq!(account.id, 2);
    }

    #[test]
    fn test_verify_pending_email_flow() {
        let mut store = open_memory();
        store
            .register("Jane", "Doe", "jane@example.com", "secret1")
            .unwrap();

        let email = store.verify_pending_email().unwrap();
        assert_eq!(email, "jane@example.com");

        // Flow is consumed
        assert_eq!(
            store.verify_pending_email(),
            Err(StoreError::NoPendingVerification)
        );

        // And the account can now log in
        assert!(store.login("jane@example.com", "secret1").is_ok());
    }

    #[test]
    fn test_verify_without_pending_flow() {
        let mut store = open_memory();
        assert_eq!(
            store.verify_pending_email(),
            Err(StoreError::NoPendingVerification)
        );
    }

    #[test]
    fn test_login_seed_admin() {
        let mut store = open_memory();

        let account = store.login("admin@example.com", "Password123!").unwrap();

        assert_eq!(account.role, Role::Admin);
        assert!(store.is_admin());
        assert_eq!(store.session().unwrap().email, "admin@example.com");
    }

    #[test]
    fn test_login_wrong_password() {
        let mut store = open_memory();

        let result = store.login("admin@example.com", "wrong");

        assert_eq!(result, Err(StoreError::InvalidCredentials));
        assert!(store.session().is_none());
    }

    #[test]
    fn test_login_unverified_account() {
        let mut store = open_memory();
        store
            .register("Jane", "Doe", "jane@example.com", "secret1")
            .unwrap();

        let result = store.login("jane@example.com", "secret1");

        assert_eq!(result, Err(StoreError::InvalidCredentials));
    }

    #[test]
    fn test_logout_clears_session_and_token() {
        let backend = Box::new(MemoryStore::new());
        let mut store = RecordStore::open(backend);
        store.login("admin@example.com", "Password123!").unwrap();

        store.logout();

        assert!(store.session().is_none());
        assert_eq!(
            store.backend.get(AUTH_TOKEN_KEY).unwrap(),
            None,
            "remember-me token removed on logout"
        );
    }

    #[test]
    fn test_account_crud_requires_admin() {
        let mut store = open_memory();
        add_verified_user(&mut store, "jane@example.com");

        // No session at all
        assert_eq!(
            store.create_department("Ops", "Operations"),
            Err(StoreError::NotAuthenticated)
        );

        store.login("jane@example.com", "secret1").unwrap();

        assert_eq!(
            store.create_account("A", "B", "x@example.com", "secret1", Role::User, true),
            Err(StoreError::NotAdmin)
        );
        assert_eq!(
            store.create_department("Ops", "Operations"),
            Err(StoreError::NotAdmin)
        );
        assert_eq!(store.delete_request(1), Err(StoreError::NotAdmin));
        assert_eq!(
            store.update_request_status(1, RequestStatus::Approved),
            Err(StoreError::NotAdmin)
        );
        assert_eq!(
            store.reset_password(1, "longenough"),
            Err(StoreError::NotAdmin)
        );
    }

    #[test]
    fn test_create_account_duplicate_email() {
        let mut store = open_admin();

        let result = store.create_account(
            "Second",
            "Admin",
            "admin@example.com",
            "secret1",
            Role::Admin,
            true,
        );

        assert_eq!(result, Err(StoreError::DuplicateEmail));
    }

    #[test]
    fn test_update_account_empty_password_keeps_existing() {
        let mut store = open_admin();
        let account = store
            .create_account("Jane", "Doe", "jane@example.com", "secret1", Role::User, true)
            .unwrap();

        store
            .update_account(
                account.id,
                "Janet",
                "Doe",
                "jane@example.com",
                "",
                Role::User,
                true,
            )
            .unwrap();

        let updated = store.db.account_by_id(account.id).unwrap();
        assert_eq!(updated.first_name, "Janet");
        assert_eq!(updated.password, "secret1");
    }

    #[test]
    fn test_update_account_replaces_password_when_given() {
        let mut store = open_admin();
        let account = store
            .create_account("Jane", "Doe", "jane@example.com", "secret1", Role::User, true)
            .unwrap();

        store
            .update_account(
                account.id,
                "Jane",
                "Doe",
                "jane@example.com",
                "newsecret",
                Role::User,
                true,
            )
            .unwrap();

        assert_eq!(
            store.db.account_by_id(account.id).unwrap().password,
            "newsecret"
        );
    }

    #[test]
    fn test_update_own_account_refreshes_session() {
        let mut store = open_admin();
        let id = store.session().unwrap().account_id;

        store
            .update_account(
                id,
                "Admin",
                "User",
                "root@example.com",
                "",
                Role::Admin,
                true,
            )
            .unwrap();

        assert_eq!(store.session().unwrap().email, "root@example.com");
    }

    #[test]
    fn test_delete_account_self_deletion() {
        let mut store = open_admin();
        let id = store.session().unwrap().account_id;
        let before = store.accounts().len();

        assert_eq!(store.delete_account(id), Err(StoreError::SelfDeletion));
        assert_eq!(store.accounts().len(), before);
    }

    #[test]
    fn test_delete_account_leaves_dangling_employee() {
        let mut store = open_admin();
        let account = store
            .create_account("Jane", "Doe", "jane@example.com", "secret1", Role::User, true)
            .unwrap();
        let employee = store
            .create_employee(
                "EMP-1",
                account.id,
                1,
                "Engineer",
                chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            )
            .unwrap();

        store.delete_account(account.id).unwrap();

        // Known gap: the employee row keeps the dead reference
        let orphan = store.employees().iter().find(|e| e.id == employee.id);
        assert_eq!(orphan.unwrap().user_id, account.id);
        assert!(store.account_for_employee(orphan.unwrap()).is_none());
    }

    #[test]
    fn test_reset_password_too_short() {
        let mut store = open_admin();

        assert_eq!(
            store.reset_password(1, "short"),
            Err(StoreError::PasswordTooShort)
        );

        assert!(store.reset_password(1, "longenough").is_ok());
        assert_eq!(store.db.account_by_id(1).unwrap().password, "longenough");
    }

    #[test]
    fn test_create_department_id_assignment() {
        let mut store = open_admin();

        // Seed has departments 1 and 2
        let dept = store.create_department("Ops", "Operations").unwrap();
        assert_eq!(dept.id, 3);
        assert_eq!(store.department(3).unwrap().name, "Ops");

        store.delete_department(3).unwrap();
        store.delete_department(2).unwrap();

        // max + 1 over the survivors
        let next = store.create_department("Sales", "Sales team").unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_delete_department_not_found() {
        let mut store = open_admin();
        assert_eq!(
            store.delete_department(99),
            Err(StoreError::NotFound {
                entity: "Department",
                id: 99
            })
        );
    }

    #[test]
    fn test_employee_crud() {
        let mut store = open_admin();
        let hire = chrono::NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();

        let employee = store
            .create_employee("EMP-1", 1, 1, "Engineer", hire)
            .unwrap();
        assert_eq!(employee.id, 1);

        let updated = store
            .update_employee(employee.id, "EMP-1", 1, 2, "Senior Engineer", hire)
            .unwrap();
        assert_eq!(updated.department_id, 2);
        assert_eq!(updated.position, "Senior Engineer");

        store.delete_employee(employee.id).unwrap();
        assert!(store.employees().is_empty());
        assert_eq!(
            store.delete_employee(employee.id),
            Err(StoreError::NotFound {
                entity: "Employee",
                id: employee.id
            })
        );
    }

    #[test]
    fn test_create_request_requires_session() {
        let mut store = open_memory();
        assert_eq!(
            store.create_request(Some(RequestType::Leave), vec![item("Vacation", 1)]),
            Err(StoreError::NotAuthenticated)
        );
    }

    #[test]
    fn test_create_request_missing_type() {
        let mut store = open_admin();
        assert_eq!(
            store.create_request(None, vec![item("Laptop", 1)]),
            Err(StoreError::MissingType)
        );
    }

    #[test]
    fn test_create_request_no_items() {
        let mut store = open_admin();

        assert_eq!(
            store.create_request(Some(RequestType::Equipment), vec![]),
            Err(StoreError::NoItems)
        );

        // Incomplete rows are filtered out before the emptiness check
        assert_eq!(
            store.create_request(
                Some(RequestType::Equipment),
                vec![item("", 3), item("Mouse", 0)]
            ),
            Err(StoreError::NoItems)
        );
    }

    #[test]
    fn test_create_request_success() {
        let mut store = open_admin();

        let request = store
            .create_request(
                Some(RequestType::Equipment),
                vec![item("Laptop", 1), item("  ", 2)],
            )
            .unwrap();

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.employee_email, "admin@example.com");
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].name, "Laptop");
    }

    #[test]
    fn test_requests_visible_filters_by_role() {
        let mut store = open_admin();
        store
            .create_request(Some(RequestType::Equipment), vec![item("Projector", 1)])
            .unwrap();

        add_verified_user(&mut store, "jane@example.com");
        store.login("jane@example.com", "secret1").unwrap();
        store
            .create_request(Some(RequestType::Leave), vec![item("Vacation", 5)])
            .unwrap();

        // Non-admin sees only their own
        let visible = store.requests_visible().unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].employee_email, "jane@example.com");

        // Admin sees everything
        store.login("admin@example.com", "Password123!").unwrap();
        assert_eq!(store.requests_visible().unwrap().len(), 2);
    }

    #[test]
    fn test_update_request_status_terminal() {
        let mut store = open_admin();
        let request = store
            .create_request(Some(RequestType::Equipment), vec![item("Laptop", 1)])
            .unwrap();

        store
            .update_request_status(request.id, RequestStatus::Approved)
            .unwrap();

        let result = store.update_request_status(request.id, RequestStatus::Rejected);
        assert_eq!(
            result,
            Err(StoreError::AlreadyResolved {
                status: RequestStatus::Approved
            })
        );
        assert_eq!(
            store.db.request_by_id(request.id).unwrap().status,
            RequestStatus::Approved
        );
    }

    #[test]
    fn test_update_request_status_not_found() {
        let mut store = open_admin();
        assert_eq!(
            store.update_request_status(42, RequestStatus::Approved),
            Err(StoreError::NotFound {
                entity: "Request",
                id: 42
            })
        );
    }

    #[test]
    fn test_delete_request() {
        let mut store = open_admin();
        let request = store
            .create_request(Some(RequestType::Resources), vec![item("Paper", 10)])
            .unwrap();

        store.delete_request(request.id).unwrap();
        assert!(store.requests_visible().unwrap().is_empty());
        assert_eq!(
            store.delete_request(request.id),
            Err(StoreError::NotFound {
                entity: "Request",
                id: request.id
            })
        );
    }

    #[test]
    fn test_mutations_persist_immediately() {
        let backend = MemoryStore::new();
        save_snapshot(&backend, &Database::seed()).unwrap();
        backend.put(AUTH_TOKEN_KEY, "admin@example.com").unwrap();

        let mut store = RecordStore::open(Box::new(backend));
        store.create_department("Ops", "Operations").unwrap();

        // A fresh load from the same backend sees the new department
        let persisted = load_snapshot(store.backend.as_ref()).unwrap().unwrap();
        assert!(persisted.departments.iter().any(|d| d.name == "Ops"));
    }
}
