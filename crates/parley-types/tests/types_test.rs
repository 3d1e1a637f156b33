use parley_types::{ChatRecord, Content, Message, Role, Theme, ThreadState};

#[test]
fn test_message_human_creation() {
    let msg = Message::human("Hello");

    assert_eq!(msg.role(), "user");
    assert!(msg.is_human());
    assert_eq!(msg.content().to_text(), "Hello");
}

#[test]
fn test_message_deserialization_by_role() {
    let json = r#"[
        {"role":"system","content":"be nice"},
        {"role":"user","content":"hi"},
        {"role":"assistant","content":[{"type":"text","text":"hey"}]},
        {"role":"tool","tool_call_id":"call_1","content":"42"}
    ]"#;
    let messages: Vec<Message> = serde_json::from_str(json).unwrap();

    let roles: Vec<&str> = messages.iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "tool"]);
    assert_eq!(messages[2].content().to_text(), "hey");
}

#[test]
fn test_assistant_without_content_defaults_to_empty() {
    let msg: Message = serde_json::from_str(r#"{"role":"assistant"}"#).unwrap();

    assert_eq!(msg.content(), &Content::default());
}

#[test]
fn test_record_role_mapping() {
    let records: Vec<ChatRecord> = vec![
        Message::human("q"),
        Message::ai("a"),
        Message::system("s"),
        Message::tool_result("call_1", "r"),
    ]
    .iter()
    .map(ChatRecord::from)
    .collect();

    assert_eq!(records[0].role, Role::User);
    assert_eq!(records[1].role, Role::Assistant);
    assert_eq!(records[2].role, Role::Assistant);
    assert_eq!(records[3].role, Role::Assistant);
    assert_eq!(records[3].content, "r");
}

#[test]
fn test_record_serialization() {
    let json = serde_json::to_string(&ChatRecord::user("hi")).unwrap();
    assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
}

#[test]
fn test_thread_state_missing_messages() {
    let state: ThreadState = serde_json::from_str(r#"{"values":{}}"#).unwrap();
    assert!(state.messages().is_empty());

    let state: ThreadState = serde_json::from_str("{}").unwrap();
    assert!(state.into_messages().is_empty());
}

#[test]
fn test_theme_parsing() {
    assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
    assert_eq!(" light ".parse::<Theme>().unwrap(), Theme::Light);
    assert!("sepia".parse::<Theme>().is_err());
    assert_eq!(Theme::default(), Theme::Dark);
}

#[test]
fn test_unknown_theme_error() {
    let err = "Sepia".parse::<Theme>().unwrap_err();
    let boxed: Box<dyn std::error::Error> = Box::new(err.clone());

    assert_eq!(err, parley_types::UnknownTheme("sepia".to_string()));
    assert_eq!(boxed.to_string(), "unknown theme: sepia");
}

#[test]
fn test_generated_thread_ids_are_distinct_uuids() {
    let a = parley_types::generate_thread_id();
    let b = parley_types::generate_thread_id();

    assert_ne!(a, b);
    assert!(uuid::Uuid::parse_str(&a).is_ok());
}
