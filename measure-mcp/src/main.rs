//! Measure MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdin/stdout.
//!
//! Tools:
//! - convert: Convert a value between two units
//! - batch_convert: Convert many values, aborting on the first failure
//! - validate_unit: Check a unit (or a unit pair) and suggest corrections
//! - list_units: List unit symbols, optionally for one category
//! - list_categories: List supported categories
//! - common_units: Curated units for one category
//! - describe_unit: Name, category and system of a unit
//!
//! Environment:
//! - RUST_LOG: log filter (default: info), logs go to stderr
//! - MEASURE_PRECISION: default decimal digits (default: 4)

use measure_core::{
    Category, ConversionOptions, ConversionRequest, ConvertError, FormatStyle, RoundingMode,
    DEFAULT_PRECISION,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::env;
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "measure";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const PRECISION_VAR: &str = "MEASURE_PRECISION";

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError {
            code: INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }
}

/// Server-wide settings
struct Server {
    defaults: ConversionOptions,
}

impl Server {
    fn new(precision: u32) -> Self {
        Server {
            defaults: ConversionOptions::new().with_precision(precision),
        }
    }

    fn from_env() -> Self {
        Self::new(precision_from(env::var(PRECISION_VAR).ok()))
    }
}

/// Parse the default precision, falling back on absent or bad values
fn precision_from(raw: Option<String>) -> u32 {
    match raw {
        None => DEFAULT_PRECISION,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(value = %raw, "{} is not a non-negative integer, using {}", PRECISION_VAR, DEFAULT_PRECISION);
            DEFAULT_PRECISION
        }),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    init_logging();

    let server = Server::from_env();

    info!("Measure MCP Server v{} started", SERVER_VERSION);
    info!("Protocol: {}", PROTOCOL_VERSION);
    info!("Default precision: {}", server.defaults.precision());

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    info!("Server ready, waiting for requests...");

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("Client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!(bytes = line.len(), "received request");

                let request: McpRequest = match serde_json::from_str(line) {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("Error parsing request: {}", e);
                        let response = error_response(
                            None,
                            McpError {
                                code: PARSE_ERROR,
                                message: format!("Parse error: {}", e),
                                data: None,
                            },
                        );
                        if let Err(e) = write_response(&response) {
                            error!("Error writing response: {}", e);
                            break;
                        }
                        continue;
                    }
                };

                debug!(method = %request.method, "processing");

                let response = handle_request(&server, &request);

                // Notifications (no id) do not receive a response
                if request.id.is_none() {
                    debug!(method = %request.method, "notification processed");
                    continue;
                }

                if let Err(e) = write_response(&response) {
                    error!("Error writing response: {}", e);
                    break;
                }
            }
            Err(e) => {
                error!("Error reading input: {}", e);
                break;
            }
        }
    }

    info!("Server shutting down");
}

fn write_response(response: &McpResponse) -> io::Result<()> {
    let json = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()
}

fn error_response(id: Option<JsonValue>, error: McpError) -> McpResponse {
    McpResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(error),
    }
}

fn handle_request(server: &Server, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(server, &request.params),

        _ => Err(McpError {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => error_response(request.id.clone(), e),
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!("Client connected: {} (protocol: {})", client_info, client_protocol);

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion for length, weight, volume, area, pressure, energy, speed, data and temperature"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Use 'convert' for single values and 'batch_convert' for lists. Unit symbols are case-insensitive. When a unit is rejected, call 'validate_unit' for suggestions."
    }))
}

fn precision_schema() -> JsonValue {
    json!({
        "type": "integer",
        "minimum": 0,
        "description": "Decimal digits in the result (default: server setting, 4 unless MEASURE_PRECISION is set)"
    })
}

fn rounding_schema() -> JsonValue {
    json!({
        "type": "string",
        "enum": ["round", "ceil", "floor"],
        "description": "Rounding mode (default: round, half away from zero)"
    })
}

fn category_schema(description: &str) -> JsonValue {
    json!({
        "type": "string",
        "enum": Category::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
        "description": description
    })
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value from one unit to another of the same category. Returns the rounded value and the formula used.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": "number", "description": "Value to convert" },
                        "from_unit": { "type": "string", "description": "Source unit (e.g., \"km\")" },
                        "to_unit": { "type": "string", "description": "Target unit (e.g., \"mile\")" },
                        "precision": precision_schema(),
                        "rounding": rounding_schema(),
                        "format": {
                            "type": "string",
                            "enum": ["short", "long"],
                            "description": "Text rendering of the result (default: short)"
                        }
                    },
                    "required": ["value", "from_unit", "to_unit"]
                }
            },
            {
                "name": "batch_convert",
                "description": "Convert several values in order. The first invalid request aborts the whole batch.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "requests": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "value": { "type": "number" },
                                    "from_unit": { "type": "string" },
                                    "to_unit": { "type": "string" },
                                    "precision": { "type": "integer", "minimum": 0 }
                                },
                                "required": ["value", "from_unit", "to_unit"]
                            },
                            "description": "Conversions to perform; per-request precision overrides the global one"
                        },
                        "precision": precision_schema(),
                        "rounding": rounding_schema()
                    },
                    "required": ["requests"]
                }
            },
            {
                "name": "validate_unit",
                "description": "Check whether a unit is known and suggest close matches. With to_unit, also checks that both units share a category.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "unit": { "type": "string", "description": "Unit to check" },
                        "to_unit": { "type": "string", "description": "Optional target unit to check against" }
                    },
                    "required": ["unit"]
                }
            },
            {
                "name": "list_units",
                "description": "List unit symbols, for one category or all of them.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": category_schema("Category filter. Omit for all units.")
                    }
                }
            },
            {
                "name": "list_categories",
                "description": "List supported categories.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "common_units",
                "description": "Commonly used units of a category.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": category_schema("Category")
                    },
                    "required": ["category"]
                }
            },
            {
                "name": "describe_unit",
                "description": "Name, category, measurement system and scale factor of a unit.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "unit": { "type": "string", "description": "Unit symbol" }
                    },
                    "required": ["unit"]
                }
            }
        ]
    }))
}

fn handle_tool_call(server: &Server, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params
        .as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    debug!(tool = name, "tool call");

    match name {
        "convert" => tool_convert(server, args),
        "batch_convert" => tool_batch_convert(server, args),
        "validate_unit" => tool_validate_unit(args),
        "list_units" => tool_list_units(args),
        "list_categories" => tool_list_categories(),
        "common_units" => tool_common_units(args),
        "describe_unit" => tool_describe_unit(args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn required_str<'a>(args: &'a JsonValue, key: &str) -> Result<&'a str, McpError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", key)))
}

fn optional_category(args: &JsonValue) -> Result<Option<Category>, McpError> {
    match args.get("category").and_then(|v| v.as_str()) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|e| McpError {
            code: INVALID_PARAMS,
            message: format!("{}", e),
            data: Some(json!({
                "available": Category::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>()
            })),
        }),
    }
}

/// Server defaults overridden by `precision` / `rounding` arguments
fn options_from(server: &Server, args: &JsonValue) -> Result<ConversionOptions, McpError> {
    let mut options = server.defaults.clone();

    if let Some(raw) = args.get("precision") {
        let precision = raw
            .as_u64()
            .and_then(|p| u32::try_from(p).ok())
            .ok_or_else(|| McpError::invalid_params("precision must be a non-negative integer"))?;
        options = options.with_precision(precision);
    }

    if let Some(raw) = args.get("rounding") {
        let rounding: RoundingMode = serde_json::from_value(raw.clone())
            .map_err(|e| McpError::invalid_params(format!("Invalid rounding: {}", e)))?;
        options = options.with_rounding(rounding);
    }

    Ok(options)
}

/// Conversion failures are tool results, not protocol errors
fn tool_error(err: &ConvertError) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": err.to_string() }],
        "error": err.report().to_json(),
        "isError": true
    })
}

fn tool_convert(server: &Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let value = args
        .get("value")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| McpError::invalid_params("Missing value argument"))?;
    let from_unit = required_str(&args, "from_unit")?;
    let to_unit = required_str(&args, "to_unit")?;
    let options = options_from(server, &args)?;

    let style = match args.get("format") {
        Some(raw) => serde_json::from_value(raw.clone())
            .map_err(|e| McpError::invalid_params(format!("Invalid format: {}", e)))?,
        None => FormatStyle::Short,
    };

    match measure_units::convert(value, from_unit, to_unit, &options) {
        Ok(result) => Ok(json!({
            "content": [{ "type": "text", "text": measure_units::format_result(&result, style) }],
            "result": result,
            "isError": false
        })),
        Err(e) => Ok(tool_error(&e)),
    }
}

fn tool_batch_convert(server: &Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let requests = args
        .get("requests")
        .ok_or_else(|| McpError::invalid_params("Missing requests argument"))?;
    let requests: Vec<ConversionRequest> = serde_json::from_value(requests.clone())
        .map_err(|e| McpError::invalid_params(format!("Invalid requests: {}", e)))?;
    let options = options_from(server, &args)?;

    match measure_units::batch_convert(&requests, &options) {
        Ok(results) => {
            let text = results
                .iter()
                .map(|r| r.format(FormatStyle::Short))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(json!({
                "content": [{ "type": "text", "text": text }],
                "results": results,
                "isError": false
            }))
        }
        Err(e) => Ok(tool_error(&e)),
    }
}

fn tool_validate_unit(args: JsonValue) -> Result<JsonValue, McpError> {
    let unit = required_str(&args, "unit")?;
    let validation = match args.get("to_unit").and_then(|v| v.as_str()) {
        Some(to_unit) => measure_units::validate_units(unit, to_unit),
        None => measure_units::validate_unit(unit),
    };

    let text = if validation.is_valid {
        "valid".to_string()
    } else {
        let mut text = validation.errors().join("; ");
        if !validation.suggestions().is_empty() {
            text.push_str(&format!(". Did you mean: {}?", validation.suggestions().join(", ")));
        }
        text
    };

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "validation": validation,
        "isError": false
    }))
}

fn tool_list_units(args: JsonValue) -> Result<JsonValue, McpError> {
    let category = optional_category(&args)?;
    let units = measure_units::available_units(category);
    Ok(json!({
        "content": [{ "type": "text", "text": units.join(", ") }],
        "units": units
    }))
}

fn tool_list_categories() -> Result<JsonValue, McpError> {
    let categories = measure_units::supported_categories();
    let text = categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "categories": categories
    }))
}

fn tool_common_units(args: JsonValue) -> Result<JsonValue, McpError> {
    let category = optional_category(&args)?
        .ok_or_else(|| McpError::invalid_params("Missing category argument"))?;
    let units = measure_units::common_units(category);
    Ok(json!({
        "content": [{ "type": "text", "text": units.join(", ") }],
        "units": units
    }))
}

fn tool_describe_unit(args: JsonValue) -> Result<JsonValue, McpError> {
    let unit = required_str(&args, "unit")?;
    match measure_units::describe_unit(unit) {
        Some(definition) => Ok(json!({
            "content": [{
                "type": "text",
                "text": format!("{} ({}): {}", definition.symbol, definition.category, definition.name)
            }],
            "unit": definition,
            "isError": false
        })),
        None => {
            let validation = measure_units::validate_unit(unit);
            Ok(json!({
                "content": [{ "type": "text", "text": format!("Unknown unit: {}", unit) }],
                "validation": validation,
                "isError": true
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: Option<i64>, method: &str, params: Option<JsonValue>) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".to_string(),
            id: id.map(|i| json!(i)),
            method: method.to_string(),
            params,
        }
    }

    fn call_tool(server: &Server, name: &str, arguments: JsonValue) -> JsonValue {
        let response = handle_request(
            server,
            &request(Some(1), "tools/call", Some(json!({ "name": name, "arguments": arguments }))),
        );
        assert!(response.error.is_none(), "{:?}", response.error);
        response.result.unwrap()
    }

    #[test]
    fn test_initialize_echoes_client_protocol() {
        let server = Server::new(4);
        let response = handle_request(
            &server,
            &request(
                Some(1),
                "initialize",
                Some(json!({ "protocolVersion": "2024-11-05", "clientInfo": { "name": "test" } })),
            ),
        );
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "measure");
        assert_eq!(response.id, Some(json!(1)));
    }

    #[test]
    fn test_tools_list() {
        let server = Server::new(4);
        let result = handle_request(&server, &request(Some(2), "tools/list", None))
            .result
            .unwrap();
        let names: Vec<&str> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "convert",
                "batch_convert",
                "validate_unit",
                "list_units",
                "list_categories",
                "common_units",
                "describe_unit"
            ]
        );
    }

    #[test]
    fn test_unknown_method() {
        let server = Server::new(4);
        let response = handle_request(&server, &request(Some(3), "resources/list", None));
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_convert_tool() {
        let server = Server::new(4);
        let result = call_tool(
            &server,
            "convert",
            json!({ "value": 1, "from_unit": "km", "to_unit": "m", "format": "long" }),
        );
        assert_eq!(result["isError"], false);
        assert_eq!(result["result"]["to_value"], 1000.0);
        assert_eq!(result["content"][0]["text"], "1 km is equal to 1000 m");
    }

    #[test]
    fn test_convert_tool_uses_server_precision() {
        let server = Server::new(1);
        let result = call_tool(&server, "convert", json!({ "value": 1, "from_unit": "mile", "to_unit": "km" }));
        assert_eq!(result["result"]["to_value"], 1.6);
        assert_eq!(result["result"]["precision"], 1);

        let result = call_tool(
            &server,
            "convert",
            json!({ "value": 1, "from_unit": "mile", "to_unit": "km", "precision": 3, "rounding": "floor" }),
        );
        assert_eq!(result["result"]["to_value"], 1.609);
    }

    #[test]
    fn test_convert_tool_invalid_unit_is_tool_error() {
        let server = Server::new(4);
        let result = call_tool(&server, "convert", json!({ "value": 1, "from_unit": "invalid", "to_unit": "m" }));
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INVALID_UNIT");
        assert_eq!(result["content"][0]["text"], "Unsupported unit: invalid");
    }

    #[test]
    fn test_convert_tool_missing_argument() {
        let server = Server::new(4);
        let response = handle_request(
            &server,
            &request(Some(1), "tools/call", Some(json!({ "name": "convert", "arguments": { "value": 1 } }))),
        );
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_batch_convert_tool() {
        let server = Server::new(4);
        let result = call_tool(
            &server,
            "batch_convert",
            json!({ "requests": [
                { "value": 1, "from_unit": "km", "to_unit": "m" },
                { "value": 0, "from_unit": "C", "to_unit": "F" }
            ]}),
        );
        assert_eq!(result["results"].as_array().unwrap().len(), 2);
        assert_eq!(result["content"][0]["text"], "1 km = 1000 m\n0 C = 32 F");

        let result = call_tool(
            &server,
            "batch_convert",
            json!({ "requests": [
                { "value": 1, "from_unit": "km", "to_unit": "m" },
                { "value": 1, "from_unit": "bogus", "to_unit": "m" }
            ]}),
        );
        assert_eq!(result["isError"], true);
    }

    #[test]
    fn test_validate_unit_tool() {
        let server = Server::new(4);
        let result = call_tool(&server, "validate_unit", json!({ "unit": "kmm" }));
        assert_eq!(result["validation"]["is_valid"], false);
        assert_eq!(result["validation"]["suggestions"][0], "km");

        let result = call_tool(&server, "validate_unit", json!({ "unit": "km", "to_unit": "kg" }));
        assert_eq!(result["validation"]["is_valid"], false);
    }

    #[test]
    fn test_listing_tools() {
        let server = Server::new(4);
        let result = call_tool(&server, "list_units", json!({ "category": "temperature" }));
        assert_eq!(result["units"], json!(["c", "f", "k"]));

        let result = call_tool(&server, "list_categories", json!({}));
        assert_eq!(result["categories"][0], "length");

        let result = call_tool(&server, "common_units", json!({ "category": "speed" }));
        assert_eq!(result["units"], json!(["kph", "mph", "mps"]));

        let response = handle_request(
            &server,
            &request(Some(1), "tools/call", Some(json!({ "name": "list_units", "arguments": { "category": "currency" } }))),
        );
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_describe_unit_tool() {
        let server = Server::new(4);
        let result = call_tool(&server, "describe_unit", json!({ "unit": "psi" }));
        assert_eq!(result["unit"]["category"], "pressure");
        assert_eq!(result["unit"]["system"], "imperial");

        let result = call_tool(&server, "describe_unit", json!({ "unit": "furlong" }));
        assert_eq!(result["isError"], true);
    }

    #[test]
    fn test_precision_from_env_value() {
        assert_eq!(precision_from(None), DEFAULT_PRECISION);
        assert_eq!(precision_from(Some("2".to_string())), 2);
        assert_eq!(precision_from(Some(" 6 ".to_string())), 6);
        assert_eq!(precision_from(Some("-1".to_string())), DEFAULT_PRECISION);
        assert_eq!(precision_from(Some("many".to_string())), DEFAULT_PRECISION);
    }
}
