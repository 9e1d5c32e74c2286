use axum::{body::Body, http::Request, response::Response};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt, Tracer},
    Context, KeyValue,
};
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context as TaskContext, Poll},
};
use tower::{Layer, Service};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::jwt::Claims;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const SERVICE_NAME: &str = "smart-fir";

/// Keep the LoggerProvider alive for the process lifetime.
static LOGGER_PROVIDER: OnceLock<opentelemetry_sdk::logs::SdkLoggerProvider> = OnceLock::new();

/// Install the console subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
    {
        eprintln!("Tracing subscriber already installed: {e}");
    }
}

fn tls_config() -> opentelemetry_otlp::tonic_types::transport::ClientTlsConfig {
    opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new().with_native_roots()
}

/// `OTEL_INGESTION_KEY` as gRPC metadata, if set and well-formed.
fn ingestion_metadata() -> Option<opentelemetry_otlp::tonic_types::metadata::MetadataMap> {
    let key = std::env::var("OTEL_INGESTION_KEY").ok().filter(|k| !k.is_empty())?;
    let value = match key.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Ignoring malformed OTEL_INGESTION_KEY");
            return None;
        }
    };
    let mut metadata = opentelemetry_otlp::tonic_types::metadata::MetadataMap::new();
    metadata.insert("ingestion-key", value);
    Some(metadata)
}

/// Set up the OTLP trace and log exporters. Must run inside a Tokio runtime.
///
/// Reads config from environment:
///   - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector gRPC address, e.g. `http://localhost:4317`
///   - `OTEL_SERVICE_NAME`: service name tag (default `smart-fir`)
///   - `OTEL_INGESTION_KEY`: access token sent as metadata (optional)
///   - `DEPLOY_ENV`: deployment environment tag (default `development`)
pub fn init_telemetry() {
    let endpoint = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(ep) => ep,
        Err(_) => {
            tracing::warn!("OTEL_EXPORTER_OTLP_ENDPOINT not set, skipping OTLP telemetry");
            return;
        }
    };

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.to_string());
    let environment = std::env::var("DEPLOY_ENV").unwrap_or_else(|_| "development".to_string());
    let tls = endpoint.starts_with("https://");

    let mut builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if tls {
        builder = builder.with_tls_config(tls_config());
    }
    if let Some(metadata) = ingestion_metadata() {
        builder = builder.with_metadata(metadata);
    }
    let exporter = match builder.build() {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create OTLP span exporter");
            return;
        }
    };

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name)
        .with_attribute(KeyValue::new("service.version", APP_VERSION))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(provider);

    // Log exporter, fed by the `log` crate.
    let mut log_builder = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if tls {
        log_builder = log_builder.with_tls_config(tls_config());
    }
    if let Some(metadata) = ingestion_metadata() {
        log_builder = log_builder.with_metadata(metadata);
    }
    let log_exporter = match log_builder.build() {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create OTLP log exporter, traces only");
            return;
        }
    };

    let logger_provider = LOGGER_PROVIDER.get_or_init(|| {
        opentelemetry_sdk::logs::SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .with_resource(resource)
            .build()
    });

    let bridge = opentelemetry_appender_log::OpenTelemetryLogBridge::new(logger_provider);
    match log::set_boxed_logger(Box::new(bridge)) {
        Ok(()) => log::set_max_level(log::LevelFilter::Info),
        Err(_) => tracing::warn!("Log bridge skipped, a log crate logger is already set"),
    }

    tracing::info!(%endpoint, version = APP_VERSION, "Telemetry initialized");
}

/// Collapse record ids so spans group by route: `/api/fir/FIR00042/status`
/// becomes `/api/fir/{id}/status`.
pub fn route_template(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let is_id = segment
                .strip_prefix("FIR")
                .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
            if is_id {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Tower layer that creates an OpenTelemetry span for each HTTP request.
///
/// Captures method, route, user-agent, request id, response status and the
/// authenticated user, if any. Place it inside the auth middleware so the
/// claims are already in the request extensions.
#[derive(Clone)]
pub struct OtelTraceLayer;

impl<S> Layer<S> for OtelTraceLayer {
    type Service = OtelTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelTraceService { inner }
    }
}

#[derive(Clone)]
pub struct OtelTraceService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for OtelTraceService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracer = global::tracer(SERVICE_NAME);
        let method = req.method().to_string();
        let route = route_template(req.uri().path());

        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string()
        };

        let mut attributes = vec![
            KeyValue::new("http.method", method.clone()),
            KeyValue::new("http.route", route.clone()),
            KeyValue::new("http.user_agent", header("user-agent")),
            KeyValue::new("http.request_id", header("x-request-id")),
        ];
        match req.extensions().get::<Claims>() {
            Some(claims) => attributes.extend([
                KeyValue::new("user.id", claims.sub.clone()),
                KeyValue::new("user.role", claims.role.clone()),
                KeyValue::new("auth.status", "authenticated"),
            ]),
            None => attributes.push(KeyValue::new("auth.status", "anonymous")),
        }

        let span = tracer
            .span_builder(format!("{method} {route}"))
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        let cx = Context::current_with_span(span);
        let mut inner = self.inner.clone();

        let guard = cx.clone().attach();
        let future = inner.call(req);
        drop(guard);

        Box::pin(async move {
            let response = future.await?;

            let span = cx.span();
            let status = response.status();
            span.set_attribute(KeyValue::new("http.status_code", status.as_u16() as i64));

            if status.is_server_error() {
                span.set_status(opentelemetry::trace::Status::error(status.to_string()));
            } else if status.is_client_error() {
                span.set_attribute(KeyValue::new("error.type", "client_error"));
            }

            Ok(response)
        })
    }
}
