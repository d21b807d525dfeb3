use dashmap::DashMap;

use crate::account::{Account, AccountNumber};

use super::AccountStore;

/// [`AccountStore`] backed by a sharded concurrent map.
///
/// A shard's write lock is held for the whole of `transact`, so
/// check-then-mutate sequences on one account never interleave.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<AccountNumber, Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, account_number: &AccountNumber) -> Option<Account> {
        self.accounts
            .get(account_number)
            .map(|entry| entry.value().clone())
    }

    fn put(&self, account: Account) {
        self.accounts
            .insert(account.account_number().clone(), account);
    }

    fn get_or_create(&self, account: Account) -> (Account, bool) {
        let key = account.account_number().clone();
        let mut created = false;
        let entry = self.accounts.entry(key).or_insert_with(|| {
            created = true;
            account
        });
        (entry.value().clone(), created)
    }

    fn list(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by(|a, b| a.account_number().cmp(b.account_number()));
        accounts
    }

    fn transact<T, E, F>(&self, account_number: &AccountNumber, f: F) -> (Result<T, E>, bool)
    where
        F: FnOnce(&mut Account) -> Result<T, E>,
    {
        // fast path avoids cloning the key for accounts that already exist
        if let Some(mut entry) = self.accounts.get_mut(account_number) {
            return (f(entry.value_mut()), false);
        }
        let mut created = false;
        let mut entry = self
            .accounts
            .entry(account_number.clone())
            .or_insert_with(|| {
                created = true;
                Account::empty(account_number.clone())
            });
        (f(entry.value_mut()), created)
    }

    fn len(&self) -> usize {
        self.accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Barrier,
        atomic::{AtomicUsize, Ordering},
    };

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    fn number(raw: &str) -> AccountNumber {
        AccountNumber::parse(raw).unwrap()
    }

    #[test]
    fn get_put_and_replace() {
        let store = InMemoryAccountStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(&number("1")), None);

        store.put(Account::new(number("1"), dec!(10)).unwrap());
        assert_eq!(store.get(&number("1")).unwrap().balance(), dec!(10));

        // last writer wins
        store.put(Account::new(number("1"), dec!(7)).unwrap());
        assert_eq!(store.get(&number("1")).unwrap().balance(), dec!(7));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_or_create_keeps_existing_account() {
        let store = InMemoryAccountStore::new();
        let (acc, created) = store.get_or_create(Account::new(number("1"), dec!(5)).unwrap());
        assert!(created);
        assert_eq!(acc.balance(), dec!(5));

        let (acc, created) = store.get_or_create(Account::empty(number("1")));
        assert!(!created);
        assert_eq!(acc.balance(), dec!(5));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn list_is_sorted_by_account_number() {
        let store = InMemoryAccountStore::new();
        for raw in ["b", "c", "a"] {
            store.put(Account::empty(number(raw)));
        }
        let numbers: Vec<String> = store
            .list()
            .iter()
            .map(|acc| acc.account_number().to_string())
            .collect();
        assert_eq!(numbers, ["a", "b", "c"]);
    }

    #[test]
    fn transact_creates_missing_account() {
        let store = InMemoryAccountStore::new();
        let (balance, created) = store.transact(&number("1"), |acc| {
            Ok::<Decimal, ()>(acc.balance())
        });
        assert_eq!(balance, Ok(dec!(0)));
        assert!(created);

        let (_, created) = store.transact(&number("1"), |_| Ok::<(), ()>(()));
        assert!(!created);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_get_or_create_creates_once() {
        let store = InMemoryAccountStore::new();
        let creations = AtomicUsize::new(0);
        let barrier = Barrier::new(16);

        std::thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| {
                    barrier.wait();
                    let (acc, created) = store.get_or_create(Account::empty(number("shared")));
                    if created {
                        creations.fetch_add(1, Ordering::SeqCst);
                    }
                    assert_eq!(acc.balance(), dec!(0));
                });
            }
        });

        assert_eq!(creations.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }
}
