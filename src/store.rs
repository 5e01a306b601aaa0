//! In-memory storage for captured emails

use crate::email::Email;

use chrono::Utc;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe collection of captured emails.
///
/// Cloning the store is cheap and every clone shares the same collection, so
/// one instance can be handed to each SMTP session and each HTTP handler.
///
/// Identifiers are assigned from a counter that starts at 1 and is never
/// reset, not even by [`EmailStore::clear`].
#[derive(Debug, Clone)]
pub struct EmailStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug)]
struct StoreInner {
    emails: Vec<Email>,
    next_id: u64,
}

impl EmailStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                emails: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Append an email, filling in the identifier and timestamp if unset
    pub fn add(&self, mut email: Email) -> Email {
        let mut inner = self.write();

        if email.id.is_empty() {
            email.id = inner.next_id.to_string();
            inner.next_id += 1;
        }
        if email.timestamp.is_none() {
            email.timestamp = Some(Utc::now());
        }

        inner.emails.push(email.clone());
        email
    }

    /// Snapshot of all emails in insertion order
    pub fn list(&self) -> Vec<Email> {
        self.read().emails.clone()
    }

    /// Look up a single email by identifier
    pub fn get(&self, id: &str) -> Option<Email> {
        self.read().emails.iter().find(|email| email.id == id).cloned()
    }

    /// Remove all emails. Identifiers keep counting from where they were.
    pub fn clear(&self) {
        self.write().emails = Vec::new();
    }

    /// Number of stored emails
    pub fn len(&self) -> usize {
        self.read().emails.len()
    }

    /// Whether the store holds no emails
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panicking writer can only poison the lock between whole operations,
    // so the data behind a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EmailStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::thread;

    fn email(subject: &str) -> Email {
        Email::new(
            "<sender@example.com>".to_string(),
            vec!["<recipient@example.com>".to_string()],
            &format!("Subject: {subject}\r\n\r\nbody\r\n"),
        )
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = EmailStore::new();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_add_assigns_id_and_timestamp() {
        let store = EmailStore::new();
        let before = Utc::now();

        let stored = store.add(email("first"));
        assert_eq!(stored.id, "1");
        assert!(stored.timestamp.unwrap() >= before);
        assert_eq!(store.list(), vec![stored]);
    }

    #[test]
    fn test_add_keeps_existing_id_and_timestamp() {
        let store = EmailStore::new();
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let mut candidate = email("preset");
        candidate.id = "custom".to_string();
        candidate.timestamp = Some(timestamp);

        let stored = store.add(candidate);
        assert_eq!(stored.id, "custom");
        assert_eq!(stored.timestamp, Some(timestamp));

        // The counter was not consumed by the preset id
        assert_eq!(store.add(email("next")).id, "1");
    }

    #[test]
    fn test_ids_are_monotonic_across_clear() {
        let store = EmailStore::new();
        let mut issued = Vec::new();

        for round in 0..3 {
            for i in 0..4 {
                let id: u64 = store.add(email(&format!("{round}-{i}"))).id.parse().unwrap();
                issued.push(id);
            }
            store.clear();
            assert!(store.list().is_empty());
        }

        assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(store.add(email("after")).id, "13");
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let store = EmailStore::new();
        let now = Utc::now();

        let mut late = email("late");
        late.timestamp = Some(now + Duration::seconds(10));
        let mut early = email("early");
        early.timestamp = Some(now);

        store.add(late);
        store.add(early);

        let subjects: Vec<_> = store.list().into_iter().map(|e| e.subject).collect();
        assert_eq!(subjects, vec!["late", "early"]);
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let store = EmailStore::new();
        store.add(email("one"));

        let snapshot = store.list();
        store.add(email("two"));
        store.clear();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].subject, "one");
    }

    #[test]
    fn test_get() {
        let store = EmailStore::new();
        store.add(email("one"));
        let two = store.add(email("two"));

        assert_eq!(store.get("2"), Some(two));
        assert_eq!(store.get("3"), None);
        assert_eq!(store.get(""), None);
    }

    #[test]
    fn test_get_after_clear() {
        let store = EmailStore::new();
        store.add(email("one"));
        store.clear();
        assert_eq!(store.get("1"), None);
    }

    #[test]
    fn test_clones_share_state() {
        let store = EmailStore::new();
        let other = store.clone();

        other.add(email("shared"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_add_and_list() {
        let store = EmailStore::new();
        let writers: Vec<_> = (0..4)
            .map(|w| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        store.add(email(&format!("{w}-{i}")));
                    }
                })
            })
            .collect();

        let reader = {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    for email in store.list() {
                        assert!(!email.id.is_empty());
                        assert!(email.timestamp.is_some());
                        assert_eq!(email.from, "<sender@example.com>");
                        assert_eq!(email.to, vec!["<recipient@example.com>"]);
                        assert_eq!(email.body, "body\r\n");
                    }
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();

        let mut ids: Vec<u64> = store.list().iter().map(|e| e.id.parse().unwrap()).collect();
        assert_eq!(ids.len(), 200);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }
}
