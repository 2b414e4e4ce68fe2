//! Sequence retrieval from the UniProt REST API.

use async_trait::async_trait;
use foldrun_common::sandbox::SandboxClient as Client;
use tracing::debug;
use url::Url;

use crate::error::{InputsError, Result};
use crate::fasta::first_record_sequence;

const UNIPROT_BASE_URL: &str = "https://rest.uniprot.org/uniprotkb";

/// Anything that can turn an accession into a protein sequence.
#[async_trait]
pub trait SequenceSource: Send + Sync {
    async fn fetch_sequence(&self, accession: &str) -> Result<String>;
}

/// Client for the UniProtKB FASTA endpoint.
pub struct UniProtClient {
    client: Client,
    base_url: String,
}

impl UniProtClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Client::new()?,
            base_url: UNIPROT_BASE_URL.to_string(),
        })
    }

    /// Point at a mirror; its host is added to the allowlist.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let invalid = |reason: String| InputsError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| invalid("no host".to_string()))?;
        self.client.allow_domain(host);
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn fasta_url(&self, accession: &str) -> String {
        format!("{}/{}.fasta", self.base_url, accession)
    }
}

/// UniProt accessions are 6 or 10 alphanumeric characters.
pub fn is_valid_accession(accession: &str) -> bool {
    matches!(accession.len(), 6 | 10) && accession.chars().all(|c| c.is_ascii_alphanumeric())
}

#[async_trait]
impl SequenceSource for UniProtClient {
    async fn fetch_sequence(&self, accession: &str) -> Result<String> {
        if !is_valid_accession(accession) {
            return Err(InputsError::InvalidAccession(accession.to_string()));
        }

        let url = self.fasta_url(accession);
        debug!("Fetching {}", url);
        let fetch_err = |reason: String| InputsError::Fetch {
            accession: accession.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)?
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?
            .error_for_status()
            .map_err(|e| fetch_err(e.to_string()))?;
        let body = response.text().await.map_err(|e| fetch_err(e.to_string()))?;

        let sequence = first_record_sequence(&body);
        if sequence.is_empty() {
            return Err(InputsError::EmptySequence(accession.to_string()));
        }
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accession_shapes() {
        assert!(is_valid_accession("P09211"));
        assert!(is_valid_accession("A0A024RBG1"));
        assert!(!is_valid_accession("P0921"));
        assert!(!is_valid_accession("../etc"));
    }

    #[test]
    fn test_fasta_url() {
        let client = UniProtClient::new().unwrap();
        assert_eq!(
            client.fasta_url("Q16772"),
            "https://rest.uniprot.org/uniprotkb/Q16772.fasta"
        );
    }

    #[test]
    fn test_mirror_base_url_is_allowlisted() {
        let client = UniProtClient::new()
            .unwrap()
            .with_base_url("http://uniprot.mirror.internal:8080/uniprotkb/")
            .unwrap();
        assert_eq!(
            client.fasta_url("P09211"),
            "http://uniprot.mirror.internal:8080/uniprotkb/P09211.fasta"
        );
        assert!(client.client.is_allowed(&client.fasta_url("P09211")));
    }

    #[test]
    fn test_mirror_with_user_info_allowlists_host() {
        let client = UniProtClient::new()
            .unwrap()
            .with_base_url("http://svc@mirror.internal/uniprotkb")
            .unwrap();
        assert!(client.client.is_allowed(&client.fasta_url("P09211")));
        assert!(!client.client.is_allowed("http://svc/uniprotkb/P09211.fasta"));
    }

    #[test]
    fn test_ipv6_mirror_allowlists_host() {
        let client = UniProtClient::new()
            .unwrap()
            .with_base_url("http://[fd00::5]:8080/uniprotkb")
            .unwrap();
        assert!(client.client.is_allowed(&client.fasta_url("P09211")));
    }

    #[test]
    fn test_unparsable_base_url_is_rejected() {
        for bad in ["uniprot.mirror.internal/uniprotkb", "data:text/plain,x"] {
            assert!(matches!(
                UniProtClient::new().unwrap().with_base_url(bad),
                Err(InputsError::InvalidBaseUrl { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_invalid_accession_is_rejected_without_network() {
        let client = UniProtClient::new().unwrap();
        assert!(matches!(
            client.fetch_sequence("not/an/id").await,
            Err(InputsError::InvalidAccession(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_gstp1() {
        let client = UniProtClient::new().unwrap();
        let seq = client.fetch_sequence("P09211").await.unwrap();
        assert!(seq.starts_with("MPPYTVVYFPVRG"));
    }
}
