//! Shared test models
#![allow(dead_code)]

use tracing_subscriber::EnvFilter;

/// Install a subscriber honoring `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub mod models {
    use std::collections::{BTreeMap, HashSet};

    use schema_reflect::error::HookError;
    use schema_reflect::schema::{Schema, SimpleType};
    use schema_reflect::types::{
        AllOfExposer, AnyOfExposer, Described, ElseExposer, Enumerated, Exposer, Field, IfExposer,
        Kind, NamedEnumerated, NotExposer, OneOfExposer, Preparer, RawExposer, Reflect,
        ThenExposer, Titled, TypeFn, TypeInfo,
    };
    use serde_json::{json, Value};

    pub struct Person {
        pub name: String,
        pub age: i64,
    }

    impl Reflect for Person {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<String>("name").tag(r#"json:"name" required:"true""#),
                Field::new::<i64>("age").tag(r#"json:"age""#),
            ])
        }
    }

    /// Singly linked list node
    pub struct Node {
        pub value: i32,
        pub next: Option<Box<Node>>,
    }

    impl Reflect for Node {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<i32>("value").tag(r#"json:"value""#),
                Field::new::<Option<Box<Node>>>("next").tag(r#"json:"next""#),
            ])
        }
    }

    /// Holds a node without being recursive itself
    pub struct List {
        pub head: Node,
    }

    impl Reflect for List {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![Field::new::<Node>("head").tag(r#"json:"head""#)])
        }
    }

    pub struct Parent {
        pub children: Vec<Child>,
    }

    impl Reflect for Parent {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<Vec<Child>>("children").tag(r#"json:"children""#),
            ])
        }
    }

    pub struct Child {
        pub parent: Option<Box<Parent>>,
    }

    impl Reflect for Child {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<Option<Box<Parent>>>("parent").tag(r#"json:"parent""#),
            ])
        }
    }

    /// Root holding the mutually recursive pair `Ping` / `Pong`
    pub struct Rally {
        pub serve: Ping,
    }

    impl Reflect for Rally {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![Field::new::<Ping>("serve").tag(r#"json:"serve""#)])
        }
    }

    pub struct Ping {
        pub pong: Option<Box<Pong>>,
    }

    impl Reflect for Ping {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<Option<Box<Pong>>>("pong").tag(r#"json:"pong,omitempty""#),
            ])
        }
    }

    pub struct Pong {
        pub ping: Option<Box<Ping>>,
    }

    impl Reflect for Pong {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<Option<Box<Ping>>>("ping").tag(r#"json:"ping,omitempty""#),
            ])
        }
    }

    pub mod v1 {
        use super::*;

        pub struct User {
            pub login: String,
        }

        impl Reflect for User {
            fn type_info() -> TypeInfo {
                TypeInfo::named_as::<Self>(
                    "User",
                    Kind::Object(vec![Field::new::<String>("login").tag(r#"json:"login""#)]),
                )
            }
        }
    }

    pub mod v2 {
        use super::*;

        pub struct User {
            pub email: String,
        }

        impl Reflect for User {
            fn type_info() -> TypeInfo {
                TypeInfo::named_as::<Self>(
                    "User",
                    Kind::Object(vec![Field::new::<String>("email").tag(r#"json:"email""#)]),
                )
            }
        }
    }

    pub struct Account {
        pub owner: v1::User,
        pub admin: v2::User,
        pub backup_owner: v1::User,
    }

    impl Reflect for Account {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<v1::User>("owner").tag(r#"json:"owner""#),
                Field::new::<v2::User>("admin").tag(r#"json:"admin""#),
                Field::new::<v1::User>("backup_owner").tag(r#"json:"backupOwner""#),
            ])
        }
    }

    pub struct Profile {
        pub nickname: Option<String>,
        pub bio: Option<String>,
        pub owner: Option<v1::User>,
    }

    impl Reflect for Profile {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<Option<String>>("nickname").tag(r#"json:"nickname""#),
                Field::new::<Option<String>>("bio").tag(r#"json:"bio,omitempty""#),
                Field::new::<Option<v1::User>>("owner").tag(r#"json:"owner""#),
            ])
        }
    }

    pub struct Collections {
        pub tags: Vec<String>,
        pub labels: BTreeMap<String, i32>,
        pub unique: HashSet<u8>,
        pub rgb: [u8; 3],
    }

    impl Reflect for Collections {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<Vec<String>>("tags").tag(r#"json:"tags""#),
                Field::new::<BTreeMap<String, i32>>("labels").tag(r#"json:"labels""#),
                Field::new::<HashSet<u8>>("unique").tag(r#"json:"unique" nullable:"false""#),
                Field::new::<[u8; 3]>("rgb").tag(r#"json:"rgb""#),
            ])
        }
    }

    /// Every numeric, length and literal tag on one type
    pub struct Constrained {
        pub score: f64,
        pub count: u32,
        pub code: String,
        pub flags: Vec<String>,
        pub kind: String,
    }

    impl Reflect for Constrained {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<f64>("score")
                    .tag(r#"json:"score" minimum:"0" maximum:"1" default:"0.5""#),
                Field::new::<u32>("count")
                    .tag(r#"json:"count" exclusiveMinimum:"0" multipleOf:"2" example:"4""#),
                Field::new::<String>("code").tag(
                    r#"json:"code" required:"true" pattern:"^[A-Z]{3}$" minLength:"3" maxLength:"3" title:"Code" description:"ISO code""#,
                ),
                Field::new::<Vec<String>>("flags")
                    .tag(r#"json:"flags" minItems:"1" uniqueItems:"true" default:"[a,b]""#),
                Field::new::<String>("kind")
                    .tag(r#"json:"kind" enum:"basic,premium" const:"basic" readOnly:"true""#),
            ])
        }
    }

    pub struct Status;

    impl Enumerated for Status {
        fn json_schema_enum() -> Vec<Value> {
            vec![json!("active"), json!("inactive")]
        }
    }

    impl Titled for Status {
        fn json_schema_title() -> String {
            "Status".to_string()
        }
    }

    impl Reflect for Status {
        fn type_info() -> TypeInfo {
            TypeInfo::named::<Self>(Kind::String)
                .with_enum::<Self>()
                .with_title::<Self>()
        }
    }

    pub struct Level;

    impl NamedEnumerated for Level {
        fn json_schema_named_enum() -> Vec<(Value, String)> {
            vec![(json!(1), "Low".to_string()), (json!(2), "High".to_string())]
        }
    }

    impl Reflect for Level {
        fn type_info() -> TypeInfo {
            TypeInfo::named::<Self>(Kind::Integer).with_named_enum::<Self>()
        }
    }

    /// Named scalar without extra keywords, always inlined
    pub struct UserId(pub String);

    impl Reflect for UserId {
        fn type_info() -> TypeInfo {
            TypeInfo::named::<Self>(Kind::String)
        }
    }

    pub struct Money;

    impl Exposer for Money {
        fn json_schema() -> Result<Schema, HookError> {
            Ok(Schema {
                pattern: Some(r"^\d+\.\d{2}$".to_string()),
                ..Schema::with_type(SimpleType::String)
            })
        }
    }

    impl Reflect for Money {
        fn type_info() -> TypeInfo {
            TypeInfo::named::<Self>(Kind::Any).with_exposer::<Self>()
        }
    }

    pub struct Uuid;

    impl RawExposer for Uuid {
        fn json_schema_bytes() -> Result<Vec<u8>, HookError> {
            Ok(br#"{"type": "string", "format": "uuid"}"#.to_vec())
        }
    }

    impl Reflect for Uuid {
        fn type_info() -> TypeInfo {
            TypeInfo::named::<Self>(Kind::Any).with_raw_exposer::<Self>()
        }
    }

    pub struct Garbled;

    impl RawExposer for Garbled {
        fn json_schema_bytes() -> Result<Vec<u8>, HookError> {
            Ok(b"{not json".to_vec())
        }
    }

    impl Reflect for Garbled {
        fn type_info() -> TypeInfo {
            TypeInfo::named::<Self>(Kind::Any).with_raw_exposer::<Self>()
        }
    }

    pub struct Invoice {
        pub id: Uuid,
        pub total: Money,
        pub status: Status,
        pub level: Level,
        pub customer: UserId,
    }

    impl Described for Invoice {
        fn json_schema_description() -> String {
            "A billed order".to_string()
        }
    }

    impl Preparer for Invoice {
        fn prepare_json_schema(schema: &mut Schema) -> Result<(), HookError> {
            schema.extra.insert("x-prepared".to_string(), json!(true));
            Ok(())
        }
    }

    impl Reflect for Invoice {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<Uuid>("id").tag(r#"json:"id""#),
                Field::new::<Money>("total").tag(r#"json:"total""#),
                Field::new::<Status>("status").tag(r#"json:"status""#),
                Field::new::<Level>("level").tag(r#"json:"level""#),
                Field::new::<UserId>("customer").tag(r#"json:"customer""#),
            ])
            .with_description::<Self>()
            .with_preparer::<Self>()
        }
    }

    pub struct Circle {
        pub radius: f64,
    }

    impl Reflect for Circle {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<f64>("radius").tag(r#"json:"radius" required:"true""#),
            ])
        }
    }

    pub struct Square {
        pub side: f64,
    }

    impl Reflect for Square {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<f64>("side").tag(r#"json:"side" required:"true""#),
            ])
        }
    }

    /// Either a circle or a square
    pub struct Shape;

    impl OneOfExposer for Shape {
        fn json_schema_one_of() -> Vec<TypeFn> {
            vec![Circle::type_info, Square::type_info]
        }
    }

    impl Reflect for Shape {
        fn type_info() -> TypeInfo {
            TypeInfo::named::<Self>(Kind::Any).with_one_of::<Self>()
        }
    }

    /// Circles must be small
    pub struct SmallCircle;

    impl IfExposer for SmallCircle {
        fn json_schema_if() -> TypeFn {
            Circle::type_info
        }
    }

    impl ThenExposer for SmallCircle {
        fn json_schema_then() -> TypeFn {
            Radius::type_info
        }
    }

    impl Reflect for SmallCircle {
        fn type_info() -> TypeInfo {
            TypeInfo::named::<Self>(Kind::Any)
                .with_if::<Self>()
                .with_then::<Self>()
        }
    }

    pub struct Radius;

    impl Reflect for Radius {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<f64>("radius").tag(r#"json:"radius" maximum:"10""#),
            ])
        }
    }

    pub struct Drawing {
        pub shape: Shape,
        pub shapes: Vec<Shape>,
    }

    impl Reflect for Drawing {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<Shape>("shape").tag(r#"json:"shape" required:"true""#),
                Field::new::<Vec<Shape>>("shapes").tag(r#"json:"shapes,omitempty""#),
            ])
        }
    }

    pub struct Base {
        pub id: String,
        pub created: String,
    }

    impl Reflect for Base {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<String>("id").tag(r#"json:"id" required:"true""#),
                Field::new::<String>("created").tag(r#"json:"created" format:"date-time""#),
            ])
        }
    }

    /// Embeds `Base`, flattening its properties
    pub struct Article {
        pub base: Base,
        pub title: String,
    }

    impl Reflect for Article {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::embedded::<Base>(),
                Field::new::<String>("title").tag(r#"json:"title""#),
            ])
        }
    }

    /// Embeds `Base` by reference
    pub struct Comment {
        pub base: Base,
        pub text: String,
    }

    impl Reflect for Comment {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::embedded::<Base>().tag(r#"refer:"true""#),
                Field::new::<String>("text").tag(r#"json:"text""#),
            ])
        }
    }

    pub struct Job {
        pub id: String,
        pub callback: fn(u8) -> bool,
    }

    impl Reflect for Job {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<String>("id").tag(r#"json:"id""#),
                Field::new::<fn(u8) -> bool>("callback").tag(r#"json:"callback""#),
            ])
        }
    }

    /// Mixed tagging: untagged, skipped, renamed through a fallback key
    pub struct Settings {
        pub theme: String,
        pub secret: String,
        pub display_name: String,
    }

    impl Reflect for Settings {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<String>("theme"),
                Field::new::<String>("secret").tag(r#"json:"-""#),
                Field::new::<String>("display_name").tag(r#"yaml:"displayName""#),
            ])
        }
    }

    pub struct BadBound {
        pub count: u32,
    }

    impl Reflect for BadBound {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<u32>("count").tag(r#"json:"count" minimum:"abc""#),
            ])
        }
    }

    pub struct BadTag {
        pub count: u32,
    }

    impl Reflect for BadTag {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![Field::new::<u32>("count").tag("json:count")])
        }
    }

    /// Anonymous recursive type; it gets a generated definition name
    pub struct Tree {
        pub children: Vec<Tree>,
    }

    impl Reflect for Tree {
        fn type_info() -> TypeInfo {
            TypeInfo::new::<Self>(Kind::Object(vec![
                Field::new::<Vec<Tree>>("children").tag(r#"json:"children""#),
            ]))
        }
    }

    pub struct Forest {
        pub tree: Tree,
    }

    impl Reflect for Forest {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![Field::new::<Tree>("tree").tag(r#"json:"tree""#)])
        }
    }

    pub struct Timestamp {
        pub seconds: i64,
    }

    impl Reflect for Timestamp {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![Field::new::<i64>("seconds").tag(r#"json:"seconds""#)])
        }
    }

    pub struct Event {
        pub at: Timestamp,
        pub owner: v1::User,
        pub reviewer: Option<v2::User>,
    }

    impl Reflect for Event {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<Timestamp>("at").tag(r#"json:"at""#),
                Field::new::<v1::User>("owner")
                    .tag(r#"json:"owner" title:"Owner" description:"Who created it""#),
                Field::new::<Option<v2::User>>("reviewer").tag(r#"json:"reviewer""#),
            ])
        }
    }

    /// Every remaining composition keyword on one type, next to an embedded reference
    pub struct Composite {
        pub base: Base,
        pub note: String,
    }

    impl AnyOfExposer for Composite {
        fn json_schema_any_of() -> Vec<TypeFn> {
            vec![Circle::type_info, Square::type_info]
        }
    }

    impl AllOfExposer for Composite {
        fn json_schema_all_of() -> Vec<TypeFn> {
            vec![Radius::type_info]
        }
    }

    impl NotExposer for Composite {
        fn json_schema_not() -> TypeFn {
            Square::type_info
        }
    }

    impl ElseExposer for Composite {
        fn json_schema_else() -> TypeFn {
            Radius::type_info
        }
    }

    impl Reflect for Composite {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::embedded::<Base>().tag(r#"refer:"true""#),
                Field::new::<String>("note").tag(r#"json:"note""#),
            ])
            .with_any_of::<Self>()
            .with_all_of::<Self>()
            .with_not::<Self>()
            .with_else::<Self>()
        }
    }

    /// Nullable reference carrying its own title
    pub struct Review {
        pub author: Option<v1::User>,
    }

    impl Reflect for Review {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![Field::new::<Option<v1::User>>("author")
                .tag(r#"json:"author" nullable:"true" title:"Author""#)])
        }
    }

    /// `Outer -> Branch -> Leaf -> Branch`, entered below the root
    pub struct Outer {
        pub branch: Branch,
    }

    impl Reflect for Outer {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![Field::new::<Branch>("branch").tag(r#"json:"branch""#)])
        }
    }

    pub struct Branch {
        pub leaf: Leaf,
    }

    impl Reflect for Branch {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![Field::new::<Leaf>("leaf").tag(r#"json:"leaf""#)])
        }
    }

    pub struct Leaf {
        pub back: Option<Box<Branch>>,
    }

    impl Reflect for Leaf {
        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>(vec![
                Field::new::<Option<Box<Branch>>>("back").tag(r#"json:"back""#),
            ])
        }
    }
}
