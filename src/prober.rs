// src/prober.rs
use crate::types::{Config, ScanError};
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Probe order. HTTPS is only tried when HTTP did not answer alive.
const PROTOCOLS: [&str; 2] = ["http", "https"];

/// Status codes that classify a host as alive. Redirects count: plenty of
/// live hosts only answer with a redirect to HTTPS or a login path.
pub const ALIVE_STATUS: Range<u16> = 200..400;

pub fn is_alive_status(status: u16) -> bool {
    ALIVE_STATUS.contains(&status)
}

/// Issues a single HEAD request and reports the status code.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn head(&self, url: &str) -> Result<u16, ScanError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, ScanError> {
        let client = Client::builder()
            .timeout(config.probe_timeout)
            .user_agent(&config.user_agent)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ScanError::Config(format!("Failed to build probe client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn head(&self, url: &str) -> Result<u16, ScanError> {
        let response = self.client.head(url).send().await?;
        Ok(response.status().as_u16())
    }
}

#[derive(Clone)]
pub struct Prober {
    transport: Arc<dyn Transport>,
    semaphore: Arc<Semaphore>,
}

impl Prober {
    pub fn new(transport: Arc<dyn Transport>, concurrency: usize) -> Self {
        Self {
            transport,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// True iff `http://host` or `https://host` answers with an alive status.
    /// Transport errors only fail the attempt they happened in.
    pub async fn is_alive(&self, host: &str) -> bool {
        for protocol in PROTOCOLS {
            let url = format!("{}://{}", protocol, host);
            match self.transport.head(&url).await {
                Ok(status) if is_alive_status(status) => return true,
                Ok(status) => debug!("{} answered {}", url, status),
                Err(e) => debug!("{} failed: {}", url, e),
            }
        }
        false
    }

    /// Probes every candidate with at most `concurrency` probes in flight.
    /// `on_result` is called as each candidate finishes. Returns the alive
    /// hosts sorted.
    pub async fn probe_all<F>(&self, candidates: &HashSet<String>, mut on_result: F) -> Vec<String>
    where
        F: FnMut(&str, bool),
    {
        let mut futures: FuturesUnordered<_> = candidates
            .iter()
            .map(|host| async move {
                // The semaphore is never closed, so acquire cannot fail here
                let _permit = self.semaphore.acquire().await.ok();
                let alive = self.is_alive(host).await;
                (host, alive)
            })
            .collect();

        let mut alive_hosts = Vec::new();
        while let Some((host, alive)) = futures.next().await {
            on_result(host, alive);
            if alive {
                alive_hosts.push(host.clone());
            }
        }

        alive_hosts.sort();
        alive_hosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted transport: unknown URLs time out.
    #[derive(Default)]
    struct FakeTransport {
        statuses: HashMap<String, u16>,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeTransport {
        fn with(statuses: &[(&str, u16)]) -> Self {
            Self {
                statuses: statuses.iter().map(|(u, s)| (u.to_string(), *s)).collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn head(&self, url: &str) -> Result<u16, ScanError> {
            self.calls.lock().unwrap().push(url.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.statuses
                .get(url)
                .copied()
                .ok_or_else(|| ScanError::Network(format!("{}: operation timed out", url)))
        }
    }

    fn prober(transport: &Arc<FakeTransport>, concurrency: usize) -> Prober {
        Prober::new(transport.clone(), concurrency)
    }

    fn hosts(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_status_boundaries() {
        assert!(!is_alive_status(199));
        assert!(is_alive_status(200));
        assert!(is_alive_status(301));
        assert!(is_alive_status(399));
        assert!(!is_alive_status(400));
        assert!(!is_alive_status(503));
    }

    #[tokio::test]
    async fn test_http_success_skips_https() {
        let transport = Arc::new(FakeTransport::with(&[
            ("http://a.example.com", 200),
            ("https://a.example.com", 200),
        ]));

        assert!(prober(&transport, 1).is_alive("a.example.com").await);
        assert_eq!(transport.calls(), vec!["http://a.example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_falls_back_to_https() {
        let transport = Arc::new(FakeTransport::with(&[("https://a.example.com", 302)]));

        assert!(prober(&transport, 1).is_alive("a.example.com").await);
        assert_eq!(
            transport.calls(),
            vec!["http://a.example.com".to_string(), "https://a.example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_status_edges_classify() {
        let transport = Arc::new(FakeTransport::with(&[
            ("http://ok.example.com", 200),
            ("http://redirect.example.com", 399),
            ("http://low.example.com", 199),
            ("https://low.example.com", 199),
            ("http://bad.example.com", 400),
            ("https://bad.example.com", 400),
        ]));
        let prober = prober(&transport, 1);

        assert!(prober.is_alive("ok.example.com").await);
        assert!(prober.is_alive("redirect.example.com").await);
        assert!(!prober.is_alive("low.example.com").await);
        assert!(!prober.is_alive("bad.example.com").await);
    }

    #[tokio::test]
    async fn test_both_protocols_time_out() {
        let transport = Arc::new(FakeTransport::default());

        assert!(!prober(&transport, 1).is_alive("b.example.com").await);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_probe_all_respects_concurrency_cap() {
        let names: Vec<String> = (0..20).map(|i| format!("h{}.example.com", i)).collect();
        let statuses: Vec<(String, u16)> = names
            .iter()
            .step_by(2)
            .map(|n| (format!("http://{}", n), 200))
            .collect();
        let transport = Arc::new(FakeTransport {
            statuses: statuses.into_iter().collect(),
            ..Default::default()
        });
        let candidates: HashSet<String> = names.into_iter().collect();

        let mut reported = 0;
        let alive = prober(&transport, 3)
            .probe_all(&candidates, |_, _| reported += 1)
            .await;

        assert_eq!(alive.len(), 10);
        assert_eq!(reported, 20);
        assert!(transport.max_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_classification_independent_of_concurrency() {
        let statuses = [
            ("http://a.example.com", 200),
            ("https://b.example.com", 301),
            ("http://c.example.com", 404),
        ];
        let candidates = hosts(&["a.example.com", "b.example.com", "c.example.com", "d.example.com"]);

        let sequential = prober(&Arc::new(FakeTransport::with(&statuses)), 1)
            .probe_all(&candidates, |_, _| {})
            .await;
        let parallel = prober(&Arc::new(FakeTransport::with(&statuses)), 16)
            .probe_all(&candidates, |_, _| {})
            .await;

        assert_eq!(sequential, vec!["a.example.com".to_string(), "b.example.com".to_string()]);
        assert_eq!(sequential, parallel);
    }

    #[tokio::test]
    async fn test_http_transport_does_not_follow_redirects() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("HEAD", "/")
            .with_status(301)
            .with_header("location", "https://example.invalid/")
            .create_async()
            .await;

        let transport = HttpTransport::new(&Config::default()).unwrap();
        let status = transport.head(&format!("{}/", server.url())).await.unwrap();
        assert_eq!(status, 301);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_transport_error_status_is_dead() {
        let mut server = Server::new_async().await;
        let _mock = server.mock("HEAD", "/").with_status(404).create_async().await;

        let transport = Arc::new(HttpTransport::new(&Config::default()).unwrap());
        let prober = Prober::new(transport, 1);
        // server.host_with_port() is plain HTTP, so the HTTPS attempt fails too
        assert!(!prober.is_alive(&server.host_with_port()).await);
    }
}
