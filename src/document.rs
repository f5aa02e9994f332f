//! Plain data extracted from the syntax tree, before any semantic
//! validation. Everything is strings and lists here; the compiler gives the
//! names meaning.
//!
//! Options are kept as buckets: unary options map a name to a target list,
//! binary options map a name to one target list per value. Entity
//! annotations fold into the same buckets, so `@dto(mapstruct) entity A` and
//! `dto mapstruct for A` produce the same document.

use indexmap::IndexMap;

use crate::grammar::RuleId;
use crate::lexer::TokenKind;
use crate::parser::{CstChild, CstNode};

pub const UNARY_OPTIONS: &[&str] = &[
    "skipClient",
    "skipServer",
    "skipUserManagement",
    "noFluentMethod",
    "filter",
];

pub const BINARY_OPTIONS: &[&str] = &[
    "dto",
    "paginate",
    "service",
    "search",
    "microservice",
    "angularSuffix",
    "clientRootFolder",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    pub fn jdl_name(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "OneToOne",
            Cardinality::OneToMany => "OneToMany",
            Cardinality::ManyToOne => "ManyToOne",
            Cardinality::ManyToMany => "ManyToMany",
        }
    }

    /// The spelling used in entity configuration files.
    pub fn json_name(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "one-to-one",
            Cardinality::OneToMany => "one-to-many",
            Cardinality::ManyToOne => "many-to-one",
            Cardinality::ManyToMany => "many-to-many",
        }
    }

    pub fn from_json_name(name: &str) -> Option<Self> {
        match name {
            "one-to-one" => Some(Cardinality::OneToOne),
            "one-to-many" => Some(Cardinality::OneToMany),
            "many-to-one" => Some(Cardinality::ManyToOne),
            "many-to-many" => Some(Cardinality::ManyToMany),
            _ => None,
        }
    }

    fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::OneToOne => Some(Cardinality::OneToOne),
            TokenKind::OneToMany => Some(Cardinality::OneToMany),
            TokenKind::ManyToOne => Some(Cardinality::ManyToOne),
            TokenKind::ManyToMany => Some(Cardinality::ManyToMany),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub applications: Vec<Application>,
    pub deployments: Vec<Deployment>,
    pub constants: IndexMap<String, i64>,
    pub entities: Vec<Entity>,
    pub enums: Vec<EnumDecl>,
    pub relationships: Vec<Relationship>,
    pub options: Options,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    pub name: String,
    pub table_name: Option<String>,
    pub javadoc: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: String,
    pub validations: Vec<FieldValidation>,
    pub javadoc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationValue {
    /// Raw numeric text, integer or decimal.
    Number(String),
    /// A name to resolve against the document constants.
    Constant(String),
    /// Regex source for `pattern(...)`.
    Pattern(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidation {
    pub name: String,
    pub value: Option<ValidationValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub javadoc: Option<String>,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub cardinality: Cardinality,
    pub from: RelationshipEnd,
    pub to: RelationshipEnd,
    /// Annotation names plus the names listed after `with`.
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipEnd {
    pub name: String,
    pub injected_field: Option<String>,
    pub display_field: Option<String>,
    pub required: bool,
    pub javadoc: Option<String>,
}

/// Entity names targeted by an option or an application, with `*` standing
/// for every declared entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityTargets {
    pub list: Vec<String>,
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub unary: IndexMap<String, EntityTargets>,
    pub binary: IndexMap<String, IndexMap<String, EntityTargets>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Str(String),
    Ident(String),
    Int(i64),
    Dec(f64),
    Bool(bool),
    List(Vec<String>),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) | ConfigValue::Ident(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Application {
    pub config: IndexMap<String, ConfigValue>,
    pub entities: EntityTargets,
    pub options: Options,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deployment {
    pub config: IndexMap<String, ConfigValue>,
}

impl Document {
    pub fn from_cst(root: &CstNode) -> Document {
        let mut doc = Document::default();
        for child in &root.children {
            let CstChild::Node(node) = child else { continue };
            match node.rule {
                RuleId::ApplicationDecl => doc.applications.push(build_application(node)),
                RuleId::DeploymentDecl => doc.deployments.push(Deployment {
                    config: build_config_items(node),
                }),
                RuleId::ConstantDecl => build_constant(node, &mut doc.constants),
                RuleId::EntityDecl => build_entity(node, &mut doc),
                RuleId::EnumDecl => doc.enums.push(build_enum(node)),
                RuleId::RelationDecl => build_relationships(node, &mut doc.relationships),
                RuleId::UnaryOptionDecl => apply_unary(node, &mut doc.options),
                RuleId::BinaryOptionDecl => apply_binary(node, &mut doc.options),
                _ => {}
            }
        }
        doc
    }
}

/// Strips the `*` gutter and surrounding blank lines from a doc comment
/// body, so `/**\n * Customer.\n */` yields `Customer.`.
pub fn trim_comment(raw: &str) -> String {
    let mut lines: Vec<&str> = raw
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map(str::trim_start).unwrap_or(line)
        })
        .collect();
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn javadoc_of(node: &CstNode) -> Option<String> {
    node.token(TokenKind::Javadoc).map(|t| trim_comment(&t.text))
}

fn build_constant(node: &CstNode, constants: &mut IndexMap<String, i64>) {
    let Some(name) = node.names().next() else { return };
    let Some(value) = node
        .token(TokenKind::Integer)
        .and_then(|t| t.text.parse::<i64>().ok())
    else {
        return;
    };
    if constants.insert(name.to_string(), value).is_some() {
        log::warn!("constant '{name}' is declared more than once, keeping the last value");
    }
}

fn build_entity(node: &CstNode, doc: &mut Document) {
    let mut names = node.names();
    let name = names.next().unwrap_or_default().to_string();
    let table_name = names.next().map(str::to_string);

    for annotation in node.nodes(RuleId::Annotation) {
        if let Some((ann_name, value)) = annotation_parts(annotation) {
            fold_annotation(&name, ann_name, value, &mut doc.options);
        }
    }

    let fields = node
        .first_node(RuleId::EntityBody)
        .map(|body| body.nodes(RuleId::FieldDecl).map(build_field).collect())
        .unwrap_or_default();

    doc.entities.push(Entity {
        name,
        table_name,
        javadoc: javadoc_of(node),
        fields,
    });
}

fn annotation_parts(node: &CstNode) -> Option<(String, Option<String>)> {
    let mut words = node.tokens().filter(|t| {
        !matches!(
            t.kind,
            TokenKind::At | TokenKind::LParen | TokenKind::RParen
        )
    });
    let name = words.next()?.text.clone();
    let value = words.next().map(|t| t.text.clone());
    Some((name, value))
}

fn fold_annotation(entity: &str, name: String, value: Option<String>, options: &mut Options) {
    match value {
        Some(value) if !UNARY_OPTIONS.contains(&name.as_str()) => {
            options
                .binary
                .entry(name)
                .or_default()
                .entry(value)
                .or_default()
                .list
                .push(entity.to_string());
        }
        _ => {
            options
                .unary
                .entry(name)
                .or_default()
                .list
                .push(entity.to_string());
        }
    }
}

fn build_field(node: &CstNode) -> Field {
    let mut names = node.names();
    let name = names.next().unwrap_or_default().to_string();
    let field_type = names.next().unwrap_or_default().to_string();

    // When a field carries both a leading and a trailing doc comment the
    // leading one wins.
    let javadoc = match node.children.first() {
        Some(CstChild::Tok(t)) if t.kind == TokenKind::Javadoc => Some(trim_comment(&t.text)),
        _ => javadoc_of(node),
    };

    Field {
        name,
        field_type,
        validations: node.nodes(RuleId::Validation).map(build_validation).collect(),
        javadoc,
    }
}

fn build_validation(node: &CstNode) -> FieldValidation {
    let head = node.tokens().next();
    let (name, kind) = match head {
        Some(tok) => (tok.text.clone(), tok.kind),
        None => (String::new(), TokenKind::Eof),
    };
    let value = match kind {
        TokenKind::Required | TokenKind::Unique => None,
        TokenKind::Pattern => node
            .token(TokenKind::Regex)
            .map(|t| ValidationValue::Pattern(t.text.clone())),
        _ => node.tokens().find_map(|t| match t.kind {
            TokenKind::Integer | TokenKind::Decimal => {
                Some(ValidationValue::Number(t.text.clone()))
            }
            TokenKind::Name => Some(ValidationValue::Constant(t.text.clone())),
            _ => None,
        }),
    };
    FieldValidation { name, value }
}

fn build_enum(node: &CstNode) -> EnumDecl {
    EnumDecl {
        name: node.names().next().unwrap_or_default().to_string(),
        javadoc: javadoc_of(node),
        values: node.nodes(RuleId::EnumValue).map(build_enum_value).collect(),
    }
}

fn build_enum_value(node: &CstNode) -> EnumValue {
    let mut toks = node
        .tokens()
        .filter(|t| matches!(t.kind, TokenKind::Name | TokenKind::Str));
    EnumValue {
        name: toks.next().map(|t| t.text.clone()).unwrap_or_default(),
        value: toks.next().map(|t| t.text.clone()),
    }
}

fn build_relationships(node: &CstNode, out: &mut Vec<Relationship>) {
    let Some(cardinality) = node.tokens().find_map(|t| Cardinality::from_token(t.kind)) else {
        return;
    };
    for body in node.nodes(RuleId::RelationshipBody) {
        let mut sides = body.nodes(RuleId::RelationshipSide);
        let (Some(from), Some(to)) = (sides.next(), sides.next()) else {
            continue;
        };
        // Annotations and the trailing `with` list both end up as options.
        let mut options: Vec<String> = body
            .nodes(RuleId::Annotation)
            .filter_map(annotation_parts)
            .map(|(name, value)| match value {
                Some(value) => format!("{name}({value})"),
                None => name,
            })
            .collect();
        options.extend(body.names().map(str::to_string));
        out.push(Relationship {
            cardinality,
            from: build_side(from),
            to: build_side(to),
            options,
        });
    }
}

fn build_side(node: &CstNode) -> RelationshipEnd {
    let mut names = node.names();
    RelationshipEnd {
        name: names.next().unwrap_or_default().to_string(),
        injected_field: names.next().map(str::to_string),
        display_field: names.next().map(str::to_string),
        required: node.has_token(TokenKind::Required),
        javadoc: javadoc_of(node),
    }
}

fn entity_list(node: &CstNode) -> Vec<String> {
    if node.has_token(TokenKind::Wildcard) || node.has_token(TokenKind::All) {
        vec!["*".to_string()]
    } else {
        node.names().map(str::to_string).collect()
    }
}

fn exclusion_list(node: &CstNode) -> Vec<String> {
    node.first_node(RuleId::Exclusion)
        .map(|n| n.names().map(str::to_string).collect())
        .unwrap_or_default()
}

fn apply_unary(node: &CstNode, options: &mut Options) {
    let Some(head) = node.tokens().next() else { return };
    let list = node
        .first_node(RuleId::EntityList)
        .map(entity_list)
        .unwrap_or_default();
    let bucket = options.unary.entry(head.text.clone()).or_default();
    bucket.list.extend(list);
    bucket.excluded.extend(exclusion_list(node));
}

fn apply_binary(node: &CstNode, options: &mut Options) {
    let Some(head) = node.tokens().next() else { return };
    let value = node.names().next().unwrap_or_default().to_string();
    let list = node
        .first_node(RuleId::EntityList)
        .map(entity_list)
        .unwrap_or_default();
    let bucket = options
        .binary
        .entry(head.text.clone())
        .or_default()
        .entry(value)
        .or_default();
    bucket.list.extend(list);
    bucket.excluded.extend(exclusion_list(node));
}

fn build_application(node: &CstNode) -> Application {
    let mut app = Application::default();
    let mut saw_entities = false;
    for child in &node.children {
        let CstChild::Node(block) = child else { continue };
        match block.rule {
            RuleId::ConfigBlock => app.config.extend(build_config_items(block)),
            RuleId::EntitiesBlock => {
                saw_entities = true;
                app.entities = EntityTargets {
                    list: block
                        .first_node(RuleId::EntityList)
                        .map(entity_list)
                        .unwrap_or_default(),
                    excluded: exclusion_list(block),
                };
            }
            RuleId::UnaryOptionDecl => apply_unary(block, &mut app.options),
            RuleId::BinaryOptionDecl => apply_binary(block, &mut app.options),
            _ => {}
        }
    }
    if !saw_entities {
        app.entities.list.push("*".to_string());
    }
    app
}

fn build_config_items(node: &CstNode) -> IndexMap<String, ConfigValue> {
    let mut config = IndexMap::new();
    for item in node.nodes(RuleId::ConfigItem) {
        let Some(key) = item.tokens().next() else { continue };
        let Some(value) = item.first_node(RuleId::ConfigValue) else {
            continue;
        };
        config.insert(key.text.clone(), build_config_value(value));
    }
    config
}

fn build_config_value(node: &CstNode) -> ConfigValue {
    if node.has_token(TokenKind::LBracket) {
        let items = node
            .tokens()
            .filter(|t| t.kind.is_word())
            .map(|t| t.text.clone())
            .collect();
        return ConfigValue::List(items);
    }
    match node.tokens().next() {
        Some(tok) => match tok.kind {
            TokenKind::Str => ConfigValue::Str(tok.text.clone()),
            TokenKind::Integer => ConfigValue::Int(tok.text.parse().unwrap_or_default()),
            TokenKind::Decimal => ConfigValue::Dec(tok.text.parse().unwrap_or_default()),
            TokenKind::True => ConfigValue::Bool(true),
            TokenKind::False => ConfigValue::Bool(false),
            _ => ConfigValue::Ident(tok.text.clone()),
        },
        None => ConfigValue::Ident(String::new()),
    }
}
