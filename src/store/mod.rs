use crate::account::{Account, AccountNumber};

pub mod in_memory_store;

pub use in_memory_store::InMemoryAccountStore;

/// Keyed account storage, the single owner of every [`Account`].
///
/// All mutation goes through [`AccountStore::transact`], which gives its
/// closure exclusive access to one account. Operations on different account
/// numbers never wait on each other beyond what the implementation's lock
/// granularity imposes.
///
/// Implementations are not reentrant: the closure passed to `transact` must
/// not call back into the store.
pub trait AccountStore: Send + Sync {
    fn get(&self, account_number: &AccountNumber) -> Option<Account>;

    /// Inserts or replaces the account under its number. Last writer wins.
    fn put(&self, account: Account);

    /// Stores `account` if its number is absent and returns the stored
    /// account plus whether this call created it. An existing account is
    /// returned unchanged.
    fn get_or_create(&self, account: Account) -> (Account, bool);

    /// Snapshot of all accounts, ordered by account number.
    fn list(&self) -> Vec<Account>;

    /// Runs `f` inside the critical section of `account_number`, creating a
    /// zero-balance account first if none exists. The returned flag reports
    /// whether the account was created by this call.
    fn transact<T, E, F>(&self, account_number: &AccountNumber, f: F) -> (Result<T, E>, bool)
    where
        F: FnOnce(&mut Account) -> Result<T, E>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
