use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::FoldrunError;

/// An HTTP client that only talks to approved hosts.
///
/// Compute nodes on the cluster usually sit behind an egress proxy; keeping
/// the list of hosts explicit makes it easy to request the right firewall
/// exceptions.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a new SandboxClient allowing the sequence databases foldrun uses.
    pub fn new() -> Result<Self, FoldrunError> {
        let allowlist = [
            "rest.uniprot.org", // UniProt REST (FASTA)
            "www.ebi.ac.uk",    // EBI mirrors
        ]
        .iter()
        .map(|d| d.to_string())
        .collect();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("foldrun/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FoldrunError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Allows a host and every subdomain of it.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        // Exact match or a subdomain of an allowed host
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// GET request builder for an allowed URL.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, FoldrunError> {
        if !self.is_allowed(url) {
            return Err(FoldrunError::SecurityError(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniprot_is_allowed() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://rest.uniprot.org/uniprotkb/P09211.fasta"));
    }

    #[test]
    fn test_unknown_host_is_rejected() {
        let client = SandboxClient::new().unwrap();
        assert!(!client.is_allowed("https://example.com/P09211.fasta"));
        assert!(!client.is_allowed("https://rest.uniprot.org.evil.net/x"));
        assert!(matches!(
            client.get("https://example.com/"),
            Err(FoldrunError::SecurityError(_))
        ));
    }

    #[test]
    fn test_allow_domain_covers_subdomains() {
        let mut client = SandboxClient::new().unwrap();
        client.allow_domain("mirror.local");
        assert!(client.is_allowed("http://uniprot.mirror.local/P1.fasta"));
        assert!(!client.is_allowed("not a url"));
    }
}
