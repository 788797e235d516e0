use serde_json::json;

use super::*;
use crate::types::{
    AuthStatus, InlineMenuVisibility, OverlayElement, RedirectFocusDirection, SubFrameDescriptor,
    SubFrameOffsets, Theme,
};

#[test]
fn test_close_message_omits_unset_options() {
    let value = serde_json::to_value(ExtensionMessage::close()).unwrap();
    assert_eq!(value, json!({"command": "closeAutofillInlineMenu"}));
}

#[test]
fn test_force_close_inline_menu_wire_format() {
    let message = ExtensionMessage::force_close_inline_menu(Some(OverlayElement::List));
    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(
        value,
        json!({
            "command": "closeAutofillInlineMenu",
            "forceCloseInlineMenu": true,
            "overlayElement": "autofill-inline-menu-list"
        })
    );
}

#[test]
fn test_force_close_wire_format() {
    let value = serde_json::to_value(ExtensionMessage::force_close()).unwrap();
    assert_eq!(
        value,
        json!({"command": "closeAutofillInlineMenu", "forceClose": true})
    );
}

#[test]
fn test_command_matches_serialized_tag() {
    let messages = vec![
        ExtensionMessage::GetAutofillInlineMenuVisibility,
        ExtensionMessage::UpdateIsFieldCurrentlyFocused {
            is_field_currently_focused: true,
        },
        ExtensionMessage::open(),
        ExtensionMessage::update_position(OverlayElement::Button),
        ExtensionMessage::TriggerAutofillOverlayReposition,
        ExtensionMessage::GetCurrentTabFrameId,
        ExtensionMessage::UpdateSubFrameData {
            sub_frame_data: SubFrameDescriptor::seed("https://a.test/", 3),
        },
    ];

    for message in messages {
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["command"], message.command());
    }
}

#[test]
fn test_update_sub_frame_data_wire_format() {
    let mut descriptor = SubFrameDescriptor::seed("https://a.test/", 3);
    descriptor.parent_frame_ids.push(0);
    descriptor.sub_frame_depth = 1;
    let value = serde_json::to_value(ExtensionMessage::UpdateSubFrameData {
        sub_frame_data: descriptor,
    })
    .unwrap();

    assert_eq!(value["subFrameData"]["frameId"], 3);
    assert_eq!(value["subFrameData"]["parentFrameIds"], json!([0]));
    assert_eq!(value["subFrameData"]["subFrameDepth"], 1);
}

#[test]
fn test_content_message_open_with_auth_status() {
    let message: ContentMessage = serde_json::from_value(json!({
        "command": "openAutofillInlineMenu",
        "isOpeningFullInlineMenu": true,
        "authStatus": "unlocked"
    }))
    .unwrap();

    assert_eq!(
        message,
        ContentMessage::OpenAutofillInlineMenu {
            is_focusing_field_element: None,
            is_opening_full_inline_menu: Some(true),
            auth_status: Some(AuthStatus::Unlocked),
        }
    );
}

#[test]
fn test_content_message_redirect_focus() {
    let message: ContentMessage = serde_json::from_value(json!({
        "command": "redirectAutofillInlineMenuFocusOut",
        "data": {"direction": "previous"}
    }))
    .unwrap();
    assert_eq!(
        message,
        ContentMessage::redirect_focus_out(RedirectFocusDirection::Previous)
    );

    let message: ContentMessage =
        serde_json::from_value(json!({"command": "redirectAutofillInlineMenuFocusOut"})).unwrap();
    assert_eq!(
        message,
        ContentMessage::RedirectAutofillInlineMenuFocusOut { data: None }
    );
}

#[test]
fn test_content_message_visibility_update() {
    let message: ContentMessage = serde_json::from_value(json!({
        "command": "updateAutofillInlineMenuVisibility",
        "data": {"inlineMenuVisibility": "onButtonClick"}
    }))
    .unwrap();
    assert_eq!(
        message,
        ContentMessage::UpdateAutofillInlineMenuVisibility {
            data: VisibilityData {
                inline_menu_visibility: InlineMenuVisibility::OnButtonClick,
            },
        }
    );
}

#[test]
fn test_content_message_numeric_visibility_update() {
    let message: ContentMessage = serde_json::from_value(json!({
        "command": "updateAutofillInlineMenuVisibility",
        "data": {"inlineMenuVisibility": 1}
    }))
    .unwrap();
    assert_eq!(
        message,
        ContentMessage::UpdateAutofillInlineMenuVisibility {
            data: VisibilityData {
                inline_menu_visibility: InlineMenuVisibility::OnButtonClick,
            },
        }
    );

    let message: ContentMessage = serde_json::from_value(json!({
        "command": "updateAutofillInlineMenuVisibility",
        "data": {"inlineMenuVisibility": 2}
    }))
    .unwrap();
    assert!(matches!(
        message,
        ContentMessage::UpdateAutofillInlineMenuVisibility {
            data: VisibilityData {
                inline_menu_visibility: InlineMenuVisibility::OnFieldFocus,
            },
        }
    ));
}

#[test]
fn test_content_message_sub_frame_requests() {
    let message: ContentMessage = serde_json::from_value(json!({
        "command": "getSubFrameOffsets",
        "subFrameUrl": "https://child.test/",
        "subFrameId": 7
    }))
    .unwrap();
    assert_eq!(
        message,
        ContentMessage::GetSubFrameOffsets {
            sub_frame_url: "https://child.test/".to_string(),
            sub_frame_id: Some(7),
        }
    );

    let message: ContentMessage = serde_json::from_value(json!({
        "command": "getSubFrameOffsetsFromWindowMessage",
        "subFrameId": 9
    }))
    .unwrap();
    assert_eq!(
        message,
        ContentMessage::GetSubFrameOffsetsFromWindowMessage { sub_frame_id: 9 }
    );
}

#[test]
fn test_unknown_content_command_is_rejected() {
    let result = serde_json::from_value::<ContentMessage>(json!({"command": "collectPageDetails"}));
    assert!(result.is_err());
}

#[test]
fn test_content_reply_response() {
    assert_eq!(ContentReply::None.into_response(), None);
    assert_eq!(ContentReply::HasValue(true).into_response(), Some(json!(true)));
    assert_eq!(
        ContentReply::SubFrameOffsets(None).into_response(),
        Some(serde_json::Value::Null)
    );

    let offsets = SubFrameOffsets {
        frame_id: Some(2),
        left: 10.0,
        top: 20.0,
        url: "https://child.test/".to_string(),
    };
    assert_eq!(
        ContentReply::SubFrameOffsets(Some(offsets)).into_response(),
        Some(json!({"frameId": 2, "left": 10.0, "top": 20.0, "url": "https://child.test/"}))
    );
}

#[test]
fn test_port_message_init_list() {
    let message = PortMessage::from_value(json!({
        "command": "initAutofillInlineMenuList",
        "portKey": "key-1",
        "theme": "nord"
    }));
    assert_eq!(
        message.command,
        PortCommand::InitList {
            port_key: "key-1".to_string(),
            theme: Some(Theme::Nord),
        }
    );
    assert_eq!(message.payload["portKey"], "key-1");
}

#[test]
fn test_port_message_update_position_styles() {
    let message = PortMessage::from_value(json!({
        "command": "updateAutofillInlineMenuPosition",
        "styles": {"top": "10px", "left": "20px"}
    }));
    match message.command {
        PortCommand::UpdatePosition { styles } => {
            assert_eq!(styles.get("top").map(String::as_str), Some("10px"));
            assert_eq!(styles.get("left").map(String::as_str), Some("20px"));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_port_message_unknown_command_is_relayed() {
    let message = PortMessage::from_value(json!({"command": "updateAutofillInlineMenuListCiphers"}));
    assert_eq!(
        message.command,
        PortCommand::Relay("updateAutofillInlineMenuListCiphers".to_string())
    );

    let message = PortMessage::from_value(json!("not an object"));
    assert_eq!(message.command, PortCommand::Relay(String::new()));
    assert!(message.payload.is_empty());
}

#[test]
fn test_window_message_parse() {
    let descriptor = SubFrameDescriptor::seed("https://child.test/", 4);
    let value = serde_json::to_value(WindowMessage::CalculateSubFramePositioning {
        sub_frame_data: descriptor.clone(),
    })
    .unwrap();
    assert_eq!(value["command"], "calculateSubFramePositioning");

    assert_eq!(
        WindowMessage::from_value(&value),
        Some(WindowMessage::CalculateSubFramePositioning {
            sub_frame_data: descriptor
        })
    );
    assert_eq!(WindowMessage::from_value(&json!({"type": "page"})), None);
}
