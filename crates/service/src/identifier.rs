//! Identifier generation with a collision check against the owning table.
//!
//! Every repository implements [`IdentifierLookup`]; services hold an
//! [`IdGenerator`] and pass their repository in when they need a fresh key.
//! The primary-key constraint stays the real uniqueness guard, the lookup
//! only avoids handing out an id that is already taken.

use async_trait::async_trait;
use rand::{rngs::OsRng, RngCore};
use tracing::{debug, warn};

use common::metrics::{ID_COLLISIONS_TOTAL, ID_EXHAUSTED_TOTAL};
use models::identifier::{Identifier, ID_BYTES};

use crate::errors::ServiceError;

/// Capability to test whether an identifier is already stored.
#[async_trait]
pub trait IdentifierLookup: Send + Sync {
    async fn exists(&self, id: &Identifier) -> Result<bool, ServiceError>;
}

#[derive(Clone, Debug)]
pub struct IdGenerator {
    max_attempts: u32,
}

impl Default for IdGenerator {
    fn default() -> Self { Self::new(Self::DEFAULT_MAX_ATTEMPTS) }
}

impl IdGenerator {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    pub fn new(max_attempts: u32) -> Self { Self { max_attempts: max_attempts.max(1) } }

    pub fn max_attempts(&self) -> u32 { self.max_attempts }

    /// A random candidate from the OS CSPRNG. Not checked for uniqueness.
    pub fn candidate() -> Identifier {
        let mut bytes = [0u8; ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Identifier::from_bytes(bytes)
    }

    /// Draw candidates until `lookup` reports one as free.
    ///
    /// # Examples
    /// ```
    /// use service::identifier::{IdGenerator, IdentifierLookup};
    /// use service::errors::ServiceError;
    /// use models::Identifier;
    ///
    /// struct Empty;
    /// #[async_trait::async_trait]
    /// impl IdentifierLookup for Empty {
    ///     async fn exists(&self, _id: &Identifier) -> Result<bool, ServiceError> { Ok(false) }
    /// }
    ///
    /// let id = tokio_test::block_on(IdGenerator::default().generate(&Empty)).unwrap();
    /// assert!(Identifier::is_valid(id.as_str()));
    /// ```
    pub async fn generate<L>(&self, lookup: &L) -> Result<Identifier, ServiceError>
    where
        L: IdentifierLookup + ?Sized,
    {
        self.generate_with(lookup, Self::candidate).await
    }

    /// Same as [`generate`](Self::generate) with a caller-supplied candidate source.
    pub async fn generate_with<L, F>(&self, lookup: &L, mut next: F) -> Result<Identifier, ServiceError>
    where
        L: IdentifierLookup + ?Sized,
        F: FnMut() -> Identifier + Send,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = next();
            if !lookup.exists(&candidate).await? {
                debug!(id = %candidate, attempt, "identifier generated");
                return Ok(candidate);
            }
            ID_COLLISIONS_TOTAL.inc();
            warn!(id = %candidate, attempt, "identifier collision; retrying");
        }
        ID_EXHAUSTED_TOTAL.inc();
        Err(ServiceError::GenerationExhausted(self.max_attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct Taken {
        ids: HashSet<String>,
        calls: AtomicU32,
    }

    impl Taken {
        fn new(ids: &[&str]) -> Self {
            Self { ids: ids.iter().map(|s| s.to_string()).collect(), calls: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl IdentifierLookup for Taken {
        async fn exists(&self, id: &Identifier) -> Result<bool, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.ids.contains(id.as_str()))
        }
    }

    struct Broken;

    #[async_trait]
    impl IdentifierLookup for Broken {
        async fn exists(&self, _id: &Identifier) -> Result<bool, ServiceError> {
            Err(ServiceError::Db("connection reset".into()))
        }
    }

    fn scripted(seq: &[&str]) -> impl FnMut() -> Identifier + Send {
        let queue = Mutex::new(seq.iter().map(|s| Identifier::parse(s).unwrap()).collect::<Vec<_>>());
        move || queue.lock().unwrap().remove(0)
    }

    #[test]
    fn candidates_are_well_formed() {
        for _ in 0..64 {
            let id = IdGenerator::candidate();
            assert!(Identifier::is_valid(id.as_str()), "{id}");
        }
    }

    #[tokio::test]
    async fn first_free_candidate_wins() {
        let lookup = Taken::new(&[]);
        let id = IdGenerator::default().generate(&lookup).await.unwrap();
        assert_eq!(id.as_str().len(), 10);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_past_collisions() {
        let lookup = Taken::new(&["aaaaaaaaaa", "bbbbbbbbbb"]);
        let next = scripted(&["aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc"]);
        let id = IdGenerator::default().generate_with(&lookup, next).await.unwrap();
        assert_eq!(id.as_str(), "cccccccccc");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let lookup = Taken::new(&["aaaaaaaaaa"]);
        let next = || Identifier::parse("aaaaaaaaaa").unwrap();
        let err = IdGenerator::new(3).generate_with(&lookup, next).await.unwrap_err();
        assert!(matches!(err, ServiceError::GenerationExhausted(3)));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn lookup_errors_propagate() {
        let err = IdGenerator::default().generate(&Broken).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));
    }

    #[test]
    fn zero_attempts_is_clamped() {
        assert_eq!(IdGenerator::new(0).max_attempts(), 1);
    }
}
