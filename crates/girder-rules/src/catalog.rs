//! Compiled-in constants the evaluator catalogue keys off: marker
//! annotation names, sink type sets, and the SQL table pattern. Kept in one
//! place; a future version may externalize them.

/// Marker opening a transactional scope.
pub const TRANSACTIONAL_MARKER: &str = "Transactional";

/// Marker moving execution onto a container-managed executor.
pub const ASYNC_MARKER: &str = "Async";

/// Marker re-invoking the method on failure.
pub const RETRYABLE_MARKER: &str = "Retryable";

/// Marker for periodically invoked jobs.
pub const SCHEDULED_MARKER: &str = "Scheduled";

/// Marker wrapping the method in a circuit breaker.
pub const CIRCUIT_BREAKER_MARKER: &str = "CircuitBreaker";

/// Markers that make a call path resilient to transient failure.
pub const RESILIENCE_MARKERS: &[&str] = &[RETRYABLE_MARKER, CIRCUIT_BREAKER_MARKER];

/// Network-client types a transactional scope must not reach.
pub const REMOTE_SINK_TYPES: &[&str] = &[
    "org.springframework.web.client.RestTemplate",
    "org.springframework.web.reactive.function.client.WebClient",
    "java.net.http.HttpClient",
    "okhttp3.OkHttpClient",
    "org.apache.http.client.HttpClient",
    "feign.Feign",
];

/// Type FQN fragments whose invocation is not safely repeatable. Matched by
/// substring so unresolved-import misses still hit.
pub const NON_IDEMPOTENT_SINK_TYPES: &[&str] = &[
    "javax.mail",
    "jakarta.mail",
    "org.springframework.mail",
    "org.springframework.kafka.core.KafkaTemplate",
    "org.springframework.amqp.rabbit.core.RabbitTemplate",
    "org.springframework.jms.core.JmsTemplate",
    "com.stripe",
    "com.twilio",
];

/// Method-name prefixes that indicate an outward effect on a
/// non-idempotent sink type.
pub const NON_IDEMPOTENT_METHOD_PREFIXES: &[&str] =
    &["send", "charge", "notify", "publish", "push"];

/// Default FQN patterns treated as non-idempotent regardless of sink type.
pub const NON_IDEMPOTENT_NAME_PATTERNS: &[&str] = &[r".*Service.*send.*"];

/// Database-template types whose update/insert calls carry SQL literals.
pub const DB_TEMPLATE_TYPES: &[&str] = &[
    "org.springframework.jdbc.core.JdbcTemplate",
    "org.springframework.jdbc.core.namedparam.NamedParameterJdbcTemplate",
];

/// Method-name prefixes on a database template that write a table.
pub const DB_UPDATE_METHOD_PREFIXES: &[&str] = &["update", "batchUpdate", "insert"];

/// Extracts the written table name from an UPDATE or INSERT statement.
pub const TABLE_NAME_PATTERN: &str = r"(?i)(?:update|insert\s+into)\s+(\w+)";
