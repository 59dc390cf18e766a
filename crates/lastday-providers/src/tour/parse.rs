//! Parser for TourAPI `locationBasedList` XML responses.
//!
//! Expected shape:
//!
//! ```xml
//! <response>
//!   <header><resultCode>0000</resultCode><resultMsg>OK</resultMsg></header>
//!   <body>
//!     <items>
//!       <item><title>...</title><mapx>...</mapx><mapy>...</mapy><dist>...</dist></item>
//!     </items>
//!     <numOfRows>30</numOfRows><pageNo>1</pageNo><totalCount>2</totalCount>
//!   </body>
//! </response>
//! ```
//!
//! A missing `body`, `items` or `item` is an empty result. Gateway errors come
//! back under an `OpenAPI_ServiceResponse` root and are surfaced as
//! [`ProviderError::Api`]. Item fields are not interpreted here.

use std::collections::BTreeMap;

use lastday_core::RawSpot;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ProviderError;

use super::PROVIDER;

const ITEM_PATH: [&str; 4] = ["response", "body", "items", "item"];
const SUCCESS_CODE: &str = "0000";

/// Parses a `locationBasedList` body into raw items, preserving document order.
///
/// # Errors
///
/// - [`ProviderError::Xml`] if the document is not well-formed or holds an
///   undecodable entity.
/// - [`ProviderError::Api`] for an error envelope or a non-`0000` result code.
/// - [`ProviderError::Parse`] for an empty document.
pub(crate) fn parse_location_based_list(xml: &str) -> Result<Vec<RawSpot>, ProviderError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut root: Option<String> = None;
    let mut envelope: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<RawSpot> = None;
    let mut items = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if root.is_none() {
                    root = Some(name.clone());
                }
                stack.push(name);
                if at_item(&stack) {
                    current = Some(BTreeMap::new());
                }
            }
            Ok(Event::End(_)) => {
                if at_item(&stack) {
                    if let Some(fields) = current.take() {
                        items.push(fields);
                    }
                }
                stack.pop();
            }
            Ok(Event::Empty(e)) => {
                if root.is_none() {
                    root = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(ProviderError::Xml)?.into_owned();
                record_text(&stack, current.as_mut(), &mut envelope, &text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                record_text(&stack, current.as_mut(), &mut envelope, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ProviderError::Xml(e)),
            _ => {}
        }
    }

    match root.as_deref() {
        Some("response") => {}
        Some(other) => {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: envelope_message(&envelope)
                    .unwrap_or_else(|| format!("unexpected root element <{other}>")),
            });
        }
        None => {
            return Err(ProviderError::Parse {
                context: "locationBasedList".to_string(),
                reason: "empty document".to_string(),
            });
        }
    }

    if let Some(code) = envelope.get("resultCode") {
        if code != SUCCESS_CODE {
            let msg = envelope
                .get("resultMsg")
                .cloned()
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: format!("{code}: {msg}"),
            });
        }
    }

    Ok(items)
}

fn at_item(stack: &[String]) -> bool {
    stack.len() == ITEM_PATH.len() && stack.iter().zip(ITEM_PATH).all(|(a, b)| a == b)
}

/// Routes text either into the open item (direct children only) or into the
/// envelope fields used for error reporting.
fn record_text(
    stack: &[String],
    current: Option<&mut RawSpot>,
    envelope: &mut BTreeMap<String, String>,
    text: &str,
) {
    let Some(tag) = stack.last() else {
        return;
    };
    match current {
        Some(fields) if stack.len() == ITEM_PATH.len() + 1 => {
            fields.entry(tag.clone()).or_default().push_str(text);
        }
        Some(_) => {}
        None => {
            if matches!(
                tag.as_str(),
                "resultCode" | "resultMsg" | "errMsg" | "returnAuthMsg" | "returnReasonCode"
            ) {
                envelope.entry(tag.clone()).or_default().push_str(text);
            }
        }
    }
}

fn envelope_message(envelope: &BTreeMap<String, String>) -> Option<String> {
    let auth = envelope.get("returnAuthMsg");
    let err = envelope.get("errMsg");
    match (err, auth) {
        (Some(err), Some(auth)) => Some(format!("{err}: {auth}")),
        (Some(msg), None) | (None, Some(msg)) => Some(msg.clone()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(items: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <response><header><resultCode>0000</resultCode><resultMsg>OK</resultMsg></header>\
             <body>{items}<numOfRows>30</numOfRows><pageNo>1</pageNo><totalCount>2</totalCount></body>\
             </response>"
        )
    }

    #[test]
    fn parses_items_in_document_order() {
        let xml = envelope(
            "<items>\
               <item><addr1>서울특별시 종로구 사직로 161</addr1><contentid>126508</contentid>\
                 <dist>1530</dist><mapx>126.9767375783</mapx><mapy>37.5760836609</mapy>\
                 <title>경복궁</title></item>\
               <item><contentid>126535</contentid><dist>2875.5</dist>\
                 <mapx>126.9910</mapx><mapy>37.5794</mapy><title>창덕궁과 후원</title></item>\
             </items>",
        );
        let items = parse_location_based_list(&xml).expect("parse");
        let field = |i: usize, k: &str| items[i].get(k).map(String::as_str);
        assert_eq!(items.len(), 2);
        assert_eq!(field(0, "title"), Some("경복궁"));
        assert_eq!(field(0, "dist"), Some("1530"));
        assert_eq!(field(0, "addr1"), Some("서울특별시 종로구 사직로 161"));
        assert_eq!(field(1, "contentid"), Some("126535"));
        assert_eq!(field(1, "dist"), Some("2875.5"));
    }

    #[test]
    fn single_item_is_a_one_element_list() {
        let xml = envelope(
            "<items><item><dist>10</dist><mapx>127.0</mapx><mapy>37.5</mapy></item></items>",
        );
        assert_eq!(parse_location_based_list(&xml).expect("parse").len(), 1);
    }

    #[test]
    fn missing_items_is_empty() {
        let xml = envelope("<items/>");
        assert!(parse_location_based_list(&xml).expect("parse").is_empty());

        let no_body = "<response><header><resultCode>0000</resultCode></header></response>";
        assert!(parse_location_based_list(no_body).expect("parse").is_empty());

        let empty_items = envelope("<items></items>");
        assert!(parse_location_based_list(&empty_items)
            .expect("parse")
            .is_empty());
    }

    #[test]
    fn unescapes_entities_and_reads_cdata() {
        let xml = envelope(
            "<items><item><title>Tom &amp; Jerry</title><overview><![CDATA[<b>hi</b>]]></overview>\
             <dist>1</dist><mapx>127.0</mapx><mapy>37.5</mapy></item></items>",
        );
        let items = parse_location_based_list(&xml).expect("parse");
        assert_eq!(items[0].get("title").map(String::as_str), Some("Tom & Jerry"));
        assert_eq!(items[0].get("overview").map(String::as_str), Some("<b>hi</b>"));
    }

    #[test]
    fn gateway_error_envelope_is_api_error() {
        let xml = "<OpenAPI_ServiceResponse><cmmMsgHeader>\
                   <errMsg>SERVICE ERROR</errMsg>\
                   <returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\
                   <returnReasonCode>30</returnReasonCode>\
                   </cmmMsgHeader></OpenAPI_ServiceResponse>";
        let err = parse_location_based_list(xml).unwrap_err();
        match err {
            ProviderError::Api { message, .. } => {
                assert!(message.contains("SERVICE_KEY_IS_NOT_REGISTERED_ERROR"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn non_success_result_code_is_api_error() {
        let xml = "<response><header><resultCode>10</resultCode>\
                   <resultMsg>INVALID_REQUEST_PARAMETER_ERROR</resultMsg></header></response>";
        let err = parse_location_based_list(xml).unwrap_err();
        assert!(
            matches!(err, ProviderError::Api { ref message, .. } if message.starts_with("10:")),
            "got {err:?}"
        );
    }

    #[test]
    fn incomplete_items_are_kept_raw() {
        let xml = envelope(
            "<items><item><title>nowhere</title><dist>5</dist></item>\
             <item><mapx>127.0</mapx><mapy>37.5</mapy><dist>far</dist></item></items>",
        );
        let items = parse_location_based_list(&xml).expect("parse");
        assert_eq!(items.len(), 2);
        assert!(!items[0].contains_key("mapx"));
        assert_eq!(items[1].get("dist").map(String::as_str), Some("far"));
    }

    #[test]
    fn undecodable_entity_is_xml_error() {
        let xml = envelope("<items><item><title>Tom &bogus; Jerry</title></item></items>");
        let err = parse_location_based_list(&xml).unwrap_err();
        assert!(matches!(err, ProviderError::Xml(_)), "got {err:?}");
    }

    #[test]
    fn malformed_xml_is_xml_error() {
        let err = parse_location_based_list("<response><body></response>").unwrap_err();
        assert!(matches!(err, ProviderError::Xml(_)), "got {err:?}");
    }

    #[test]
    fn empty_document_is_parse_error() {
        assert!(matches!(
            parse_location_based_list(""),
            Err(ProviderError::Parse { .. })
        ));
    }
}
