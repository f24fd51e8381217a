//! 환율 페이지 조회.
//!
//! 소스 디스크립터의 헤더로 요청하고, 응답 본문을 디스크립터에 명시된 인코딩으로
//! 디코딩합니다. 재시도는 하지 않습니다 (외부 스케줄러의 책임).

use async_trait::async_trait;
use fx_core::SourceConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::error::FetchError;

/// 원본 문서 조회 인터페이스.
#[async_trait]
pub trait RateFetcher: Send + Sync {
    /// 소스 페이지를 조회하여 디코딩된 텍스트를 반환합니다.
    async fn fetch(&self, source: &SourceConfig) -> Result<String, FetchError>;
}

/// reqwest 기반 HTTP 조회기.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// 기본 클라이언트로 생성.
    ///
    /// 타임아웃과 헤더는 요청마다 디스크립터에서 적용합니다.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// 외부에서 구성한 클라이언트로 생성.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RateFetcher for HttpFetcher {
    async fn fetch(&self, source: &SourceConfig) -> Result<String, FetchError> {
        let encoding = source
            .resolve_encoding()
            .ok_or_else(|| FetchError::UnsupportedEncoding(source.encoding.clone()))?;

        let response = self
            .client
            .get(&source.url)
            .headers(build_headers(source))
            .timeout(source.timeout())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(url = %source.url, status = status.as_u16(), "응답 수신");

        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                url: source.url.clone(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let (text, actual, had_errors) = encoding.decode(&bytes);
        if had_errors {
            tracing::warn!(
                url = %source.url,
                encoding = actual.name(),
                "디코딩 중 잘못된 바이트를 대체 문자로 치환"
            );
        }

        Ok(text.into_owned())
    }
}

/// 디스크립터 헤더를 `HeaderMap`으로 변환합니다. 잘못된 헤더는 건너뜁니다.
fn build_headers(source: &SourceConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in &source.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "잘못된 요청 헤더 무시"),
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;

    fn source_for(server: &mockito::Server, path: &str) -> SourceConfig {
        let mut source = SourceConfig::ctbc();
        source.url = format!("{}{}", server.url(), path);
        source
    }

    #[tokio::test]
    async fn test_fetch_sends_source_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rates")
            .match_header("referer", "https://www.ctbcbank.com/")
            .match_header("accept-language", "zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7")
            .with_status(200)
            .with_body("<html>美金</html>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let body = fetcher.fetch(&source_for(&server, "/rates")).await.unwrap();

        assert_eq!(body, "<html>美金</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_server_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rates")
            .with_status(500)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let err = fetcher
            .fetch(&source_for(&server, "/rates"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        let mut source = SourceConfig::bank_of_taiwan();
        source.url = "http://127.0.0.1:1/xrt".to_string();
        source.timeout_secs = 5;

        let err = HttpFetcher::new().unwrap().fetch(&source).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));

        let wrapped = ScrapeError::Fetch {
            institution: source.name.clone(),
            source: err,
        };
        assert!(wrapped.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_decodes_declared_encoding() {
        let (big5, _, _) = encoding_rs::BIG5.encode("日圓 (JPY)");

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/big5")
            .with_status(200)
            .with_body(big5.into_owned())
            .create_async()
            .await;

        let source = source_for(&server, "/big5").with_encoding("big5");
        let body = HttpFetcher::new().unwrap().fetch(&source).await.unwrap();

        assert_eq!(body, "日圓 (JPY)");
    }

    #[tokio::test]
    async fn test_fetch_unknown_encoding() {
        let server = mockito::Server::new_async().await;
        let source = source_for(&server, "/rates").with_encoding("not-a-charset");

        let err = HttpFetcher::new().unwrap().fetch(&source).await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedEncoding(label) if label == "not-a-charset"));
    }

    #[test]
    fn test_build_headers_skips_invalid() {
        let source = SourceConfig::bank_of_taiwan().with_header("Bad Header", "x");
        let headers = build_headers(&source);

        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key("user-agent"));
    }
}
