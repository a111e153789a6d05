use gloo_net::http::{Request, RequestBuilder};
use http::StatusCode;
use shikkha_client::transport::{HttpRequest, HttpResponse, Transport, TransportError};

/// Sends requests with the browser's `fetch`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlooTransport;

fn builder(request: &HttpRequest) -> Result<RequestBuilder, TransportError> {
    let builder = match request.method.as_str() {
        "GET" => Request::get(&request.url),
        "POST" => Request::post(&request.url),
        "PUT" => Request::put(&request.url),
        "DELETE" => Request::delete(&request.url),
        other => return Err(TransportError(format!("Unsupported method {other}"))),
    };

    Ok(request
        .headers
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name, value)))
}

#[async_trait::async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = builder(&request)?;
        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = StatusCode::from_u16(response.status())
            .map_err(|e| TransportError(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
