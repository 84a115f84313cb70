// Telemetry codec
//
// Wire shapes of the WebAccess JSON service: the tag query body sent on
// every poll, the `{ Result, Values }` envelope that comes back, the
// path-style command URL and the Basic-Auth header value.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

const SERVICE_ROOT: &str = "/WaWebService/Json";

// ── Request body ─────────────────────────────────────────────────────

/// Outbound tag query.
///
/// ```json
/// { "Tags": [ { "Name": "greenLamp" }, { "Name": "Fan" } ] }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagQuery<'a> {
    pub tags: Vec<TagName<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagName<'a> {
    pub name: &'a str,
}

impl<'a> TagQuery<'a> {
    pub fn new<S: AsRef<str>>(tags: &'a [S]) -> Self {
        Self {
            tags: tags.iter().map(|t| TagName { name: t.as_ref() }).collect(),
        }
    }
}

// ── Response envelope ────────────────────────────────────────────────

/// Raw tag-value envelope as the controller sends it.
///
/// ```json
/// { "Result": { "Ret": 0, "Total": 1 },
///   "Values": [ { "Name": "greenLamp", "Value": 1, "Quality": 0 } ] }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TagValuesEnvelope {
    #[serde(default)]
    result: ResultSummary,
    #[serde(default)]
    values: Option<Vec<TagReading>>,
}

/// `Result` object of the envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultSummary {
    #[serde(default)]
    pub ret: i64,
    #[serde(default)]
    pub total: i64,
}

/// One `(name, value, quality)` triple of a frame.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagReading {
    pub name: String,
    pub value: f64,
    /// Forwarded as-is, never interpreted.
    #[serde(default)]
    pub quality: i64,
}

/// Decoded result of one poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryFrame {
    pub ret: i64,
    pub total: i64,
    pub readings: Vec<TagReading>,
}

impl TelemetryFrame {
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }
}

// ── Encoding / decoding ──────────────────────────────────────────────

/// Serialize the tag query body, preserving the given order.
pub fn encode_query<S: AsRef<str>>(tags: &[S]) -> Vec<u8> {
    // A struct of strings cannot fail to serialize.
    serde_json::to_vec(&TagQuery::new(tags)).unwrap_or_default()
}

/// Parse a tag-value response body.
///
/// Malformed JSON and an absent or `null` `Values` array are errors. An
/// empty `Values` array is a valid frame with no readings.
pub fn decode_frame(body: &[u8]) -> Result<TelemetryFrame, Error> {
    let envelope: TagValuesEnvelope =
        serde_json::from_slice(body).map_err(|e| Error::Decode {
            message: e.to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
        })?;

    let Some(readings) = envelope.values else {
        return Err(Error::Decode {
            message: "response has no Values array".into(),
            body: String::from_utf8_lossy(body).into_owned(),
        });
    };

    Ok(TelemetryFrame {
        ret: envelope.result.ret,
        total: envelope.result.total,
        readings,
    })
}

// ── URL & header construction ────────────────────────────────────────

/// Turn a configured host address into a base URL.
///
/// Accepts `192.168.1.31`, `scada.local:8080`, or a full `http(s)://` URL.
/// Bare hosts are assumed to speak plain HTTP.
pub fn base_url(host: &str) -> Result<Url, Error> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::InvalidUrl(url::ParseError::EmptyHost));
    }

    let url = if host.contains("://") {
        Url::parse(host)?
    } else {
        Url::parse(&format!("http://{host}"))?
    };

    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::InvalidUrl(url::ParseError::EmptyHost));
    }
    Ok(url)
}

/// `/WaWebService/Json/GetTagValue/{suffix}`
pub fn query_path(suffix: &str) -> String {
    format!("{SERVICE_ROOT}/GetTagValue/{suffix}")
}

/// `/WaWebService/Json/SetTagValue/{group}/{tag}/{value}`, with `group`
/// and `tag` percent-encoded as single path segments.
pub fn command_path(group: &str, tag: &str, value: i64) -> Result<String, Error> {
    let base = Url::parse("http://localhost/")?;
    Ok(encode_command(&base, group, tag, value)?.path().to_owned())
}

/// Build the full command URL against a base.
///
/// `group` and `tag` always stay one segment each: `/`, `?` and `#` are
/// percent-encoded, and the dot segments `.` and `..` are refused.
pub fn encode_command(base: &Url, group: &str, tag: &str, value: i64) -> Result<Url, Error> {
    for (field, segment) in [("group", group), ("tag", tag)] {
        if matches!(segment, "" | "." | "..") {
            return Err(Error::Client(format!(
                "invalid {field} '{segment}' for a command path"
            )));
        }
    }

    let value = value.to_string();
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .clear()
        .extend(["WaWebService", "Json", "SetTagValue", group, tag, &value]);
    Ok(url)
}

/// `Authorization` header value: `Basic base64("{username}:{password}")`.
///
/// Produced for empty credentials too; an empty-password account is valid.
pub fn basic_auth_value(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn query_body_matches_wire_format() {
        let body = encode_query(&["BuzzerLamp", "greenLamp"]);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"Tags":[{"Name":"BuzzerLamp"},{"Name":"greenLamp"}]}"#
        );
    }

    #[test]
    fn query_body_for_no_tags() {
        let tags: [&str; 0] = [];
        assert_eq!(encode_query(&tags), br#"{"Tags":[]}"#);
    }

    #[test]
    fn decodes_full_envelope() {
        let body = br#"{"Result":{"Ret":0,"Total":2},"Values":[
            {"Name":"greenLamp","Value":1,"Quality":0},
            {"Name":"Flow_1","Value":12.5,"Quality":192}
        ]}"#;

        let frame = decode_frame(body).unwrap();
        assert_eq!(frame.ret, 0);
        assert_eq!(frame.total, 2);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.readings[0].name, "greenLamp");
        assert_eq!(frame.readings[0].value, 1.0);
        assert_eq!(frame.readings[1].value, 12.5);
        assert_eq!(frame.readings[1].quality, 192);
    }

    #[test]
    fn empty_values_is_a_valid_frame() {
        let frame = decode_frame(br#"{"Result":{"Ret":0,"Total":0},"Values":[]}"#).unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn missing_result_and_quality_default_to_zero() {
        let frame = decode_frame(br#"{"Values":[{"Name":"Fan","Value":0}]}"#).unwrap();
        assert_eq!(frame.ret, 0);
        assert_eq!(frame.readings[0].quality, 0);
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = decode_frame(b"{\"Result\": ").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn absent_or_null_values_is_a_decode_error() {
        for body in [
            &br#"{"Result":{"Ret":0,"Total":0}}"#[..],
            &br#"{"Result":{"Ret":0,"Total":0},"Values":null}"#[..],
        ] {
            let err = decode_frame(body).unwrap_err();
            match err {
                Error::Decode { message, .. } => assert!(message.contains("Values")),
                other => panic!("expected Decode, got {other:?}"),
            }
        }
    }

    #[test]
    fn basic_auth_with_empty_password() {
        assert_eq!(basic_auth_value("admin", ""), "Basic YWRtaW46");
        assert_eq!(basic_auth_value("", ""), "Basic Og==");
    }

    #[test]
    fn base_url_accepts_bare_hosts_and_full_urls() {
        assert_eq!(base_url("192.168.1.31").unwrap().as_str(), "http://192.168.1.31/");
        assert_eq!(
            base_url(" scada.local:8080 ").unwrap().as_str(),
            "http://scada.local:8080/"
        );
        assert_eq!(
            base_url("https://scada.example.com").unwrap().as_str(),
            "https://scada.example.com/"
        );
        assert!(base_url("").is_err());
        assert!(base_url("   ").is_err());
        assert!(base_url("http://").is_err());
    }

    #[test]
    fn command_url_is_path_style() {
        let base = base_url("10.0.0.5").unwrap();
        let url = encode_command(&base, "WaterPump", "Pump1_1", 1).unwrap();
        assert_eq!(
            url.as_str(),
            "http://10.0.0.5/WaWebService/Json/SetTagValue/WaterPump/Pump1_1/1"
        );
        assert_eq!(query_path("express"), "/WaWebService/Json/GetTagValue/express");
        assert_eq!(
            command_path("TrainerKit", "Fan", 0).unwrap(),
            "/WaWebService/Json/SetTagValue/TrainerKit/Fan/0"
        );
    }

    #[test]
    fn command_url_replaces_base_path() {
        let base = base_url("http://10.0.0.5/scada/?x=1").unwrap();
        let url = encode_command(&base, "TrainerKit", "Fan", 0).unwrap();
        assert_eq!(
            url.as_str(),
            "http://10.0.0.5/WaWebService/Json/SetTagValue/TrainerKit/Fan/0"
        );
    }

    #[test]
    fn reserved_characters_stay_inside_the_tag_segment() {
        let base = base_url("10.0.0.5").unwrap();

        let url = encode_command(&base, "TrainerKit", "../../GetTagValue/express", 1).unwrap();
        assert_eq!(
            url.path(),
            "/WaWebService/Json/SetTagValue/TrainerKit/..%2F..%2FGetTagValue%2Fexpress/1"
        );

        let url = encode_command(&base, "TrainerKit", "Fan?x=1", 1).unwrap();
        assert_eq!(url.path(), "/WaWebService/Json/SetTagValue/TrainerKit/Fan%3Fx=1/1");
        assert_eq!(url.query(), None);

        let url = encode_command(&base, "TrainerKit", "a#b", 0).unwrap();
        assert_eq!(url.path(), "/WaWebService/Json/SetTagValue/TrainerKit/a%23b/0");
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn dot_segments_are_refused() {
        let base = base_url("10.0.0.5").unwrap();
        for tag in ["", ".", ".."] {
            let err = encode_command(&base, "TrainerKit", tag, 1).unwrap_err();
            assert!(matches!(err, Error::Client(_)), "tag {tag:?}: {err:?}");
        }
        assert!(encode_command(&base, "..", "Fan", 1).is_err());
    }
}
