//! Write-credential check used by [`CatalogService`](crate::service::CatalogService).

/// Decides whether a submitted credential authorizes catalog writes.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, candidate: &str) -> bool;
}

/// Plain equality against a fixed secret. Intended for tests; the server
/// uses a digest-based verifier.
pub struct PlainSecret(pub String);

impl CredentialVerifier for PlainSecret {
    fn verify(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}
