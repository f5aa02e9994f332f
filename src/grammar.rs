//! The JDL grammar as data. Each production is a [`Term`] tree referencing
//! other productions by [`RuleId`]; the parser is a small PEG interpreter
//! over this table. Ordered choice applies: the first alternative that
//! matches wins, and a failed branch backtracks.

use crate::lexer::TokenKind as K;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleId {
    Prog,
    ConstantDecl,
    EntityDecl,
    Annotation,
    EntityBody,
    FieldDecl,
    Validation,
    RelationDecl,
    RelationshipBody,
    RelationshipSide,
    EnumDecl,
    EnumValue,
    EntityList,
    Exclusion,
    UnaryOptionDecl,
    BinaryOptionDecl,
    ApplicationDecl,
    ConfigBlock,
    ConfigItem,
    ConfigValue,
    EntitiesBlock,
    DeploymentDecl,
}

#[derive(Debug)]
pub enum Term {
    /// A single token of the given kind.
    Tok(K),
    /// A NAME or any keyword token. Config keys, config values and
    /// annotation names land here since words like `microservice` lex as
    /// keywords.
    Word,
    /// Another production; produces a child node in the tree.
    Ref(RuleId),
    Seq(&'static [Term]),
    Alt(&'static [Term]),
    Opt(&'static Term),
    Star(&'static Term),
    /// Matches the inner term only when the next token starts on the same
    /// line as the previously consumed one. Used for trailing field
    /// comments: a doc comment on its own line belongs to the next field.
    SameLine(&'static Term),
}

pub struct Rule {
    pub id: RuleId,
    pub def: Term,
}

use RuleId::*;
use Term::*;

/// Indexed by `RuleId as usize`.
pub static RULES: &[Rule] = &[
    Rule {
        id: Prog,
        def: Star(&Alt(&[
            Ref(ApplicationDecl),
            Ref(DeploymentDecl),
            Ref(ConstantDecl),
            Ref(EnumDecl),
            Ref(EntityDecl),
            Ref(RelationDecl),
            Ref(UnaryOptionDecl),
            Ref(BinaryOptionDecl),
        ])),
    },
    Rule {
        id: ConstantDecl,
        def: Seq(&[Tok(K::Name), Tok(K::Equals), Tok(K::Integer)]),
    },
    Rule {
        id: EntityDecl,
        def: Seq(&[
            Opt(&Tok(K::Javadoc)),
            Star(&Ref(Annotation)),
            Tok(K::Entity),
            Tok(K::Name),
            Opt(&Seq(&[Tok(K::LParen), Tok(K::Name), Tok(K::RParen)])),
            Opt(&Ref(EntityBody)),
        ]),
    },
    Rule {
        id: Annotation,
        def: Seq(&[
            Tok(K::At),
            Word,
            Opt(&Seq(&[
                Tok(K::LParen),
                Alt(&[Word, Tok(K::Integer), Tok(K::Decimal), Tok(K::Str)]),
                Tok(K::RParen),
            ])),
        ]),
    },
    Rule {
        id: EntityBody,
        def: Seq(&[
            Tok(K::LBrace),
            Star(&Seq(&[Ref(FieldDecl), Opt(&Tok(K::Comma))])),
            Tok(K::RBrace),
        ]),
    },
    Rule {
        id: FieldDecl,
        def: Seq(&[
            Opt(&Tok(K::Javadoc)),
            Tok(K::Name),
            Tok(K::Name),
            Star(&Ref(Validation)),
            Opt(&SameLine(&Tok(K::Javadoc))),
        ]),
    },
    Rule {
        id: Validation,
        def: Alt(&[
            Tok(K::Required),
            Tok(K::Unique),
            Seq(&[
                Alt(&[
                    Tok(K::Minlength),
                    Tok(K::Maxlength),
                    Tok(K::Minbytes),
                    Tok(K::Maxbytes),
                    Tok(K::Min),
                    Tok(K::Max),
                ]),
                Tok(K::LParen),
                Alt(&[Tok(K::Integer), Tok(K::Decimal), Tok(K::Name)]),
                Tok(K::RParen),
            ]),
            Seq(&[Tok(K::Pattern), Tok(K::LParen), Tok(K::Regex), Tok(K::RParen)]),
        ]),
    },
    Rule {
        id: RelationDecl,
        def: Seq(&[
            Tok(K::Relationship),
            Alt(&[
                Tok(K::OneToOne),
                Tok(K::OneToMany),
                Tok(K::ManyToOne),
                Tok(K::ManyToMany),
            ]),
            Tok(K::LBrace),
            Ref(RelationshipBody),
            Star(&Seq(&[Opt(&Tok(K::Comma)), Ref(RelationshipBody)])),
            Tok(K::RBrace),
        ]),
    },
    Rule {
        id: RelationshipBody,
        def: Seq(&[
            Star(&Ref(Annotation)),
            Ref(RelationshipSide),
            Tok(K::To),
            Ref(RelationshipSide),
            Opt(&Seq(&[
                Tok(K::With),
                Tok(K::Name),
                Star(&Seq(&[Tok(K::Comma), Tok(K::Name)])),
            ])),
        ]),
    },
    Rule {
        id: RelationshipSide,
        def: Seq(&[
            Opt(&Tok(K::Javadoc)),
            Tok(K::Name),
            Opt(&Seq(&[
                Tok(K::LBrace),
                Tok(K::Name),
                Opt(&Seq(&[Tok(K::LParen), Tok(K::Name), Tok(K::RParen)])),
                Opt(&Tok(K::Required)),
                Tok(K::RBrace),
            ])),
        ]),
    },
    Rule {
        id: EnumDecl,
        def: Seq(&[
            Opt(&Tok(K::Javadoc)),
            Tok(K::Enum),
            Tok(K::Name),
            Tok(K::LBrace),
            Ref(EnumValue),
            Star(&Seq(&[Opt(&Tok(K::Comma)), Ref(EnumValue)])),
            Tok(K::RBrace),
        ]),
    },
    Rule {
        id: EnumValue,
        def: Seq(&[
            Tok(K::Name),
            Opt(&Seq(&[
                Tok(K::LParen),
                Alt(&[Tok(K::Name), Tok(K::Str)]),
                Tok(K::RParen),
            ])),
        ]),
    },
    Rule {
        id: EntityList,
        def: Alt(&[
            Tok(K::Wildcard),
            Tok(K::All),
            Seq(&[Tok(K::Name), Star(&Seq(&[Tok(K::Comma), Tok(K::Name)]))]),
        ]),
    },
    Rule {
        id: Exclusion,
        def: Seq(&[
            Tok(K::Except),
            Tok(K::Name),
            Star(&Seq(&[Tok(K::Comma), Tok(K::Name)])),
        ]),
    },
    Rule {
        id: UnaryOptionDecl,
        def: Seq(&[
            Alt(&[
                Tok(K::SkipClient),
                Tok(K::SkipServer),
                Tok(K::SkipUserManagement),
                Tok(K::NoFluentMethod),
                Tok(K::Filter),
            ]),
            Opt(&Tok(K::For)),
            Ref(EntityList),
            Opt(&Ref(Exclusion)),
        ]),
    },
    Rule {
        id: BinaryOptionDecl,
        def: Seq(&[
            Alt(&[
                Tok(K::Dto),
                Tok(K::Paginate),
                Tok(K::Service),
                Tok(K::Search),
                Tok(K::Microservice),
                Tok(K::AngularSuffix),
                Tok(K::ClientRootFolder),
            ]),
            Tok(K::Name),
            Tok(K::For),
            Ref(EntityList),
            Opt(&Ref(Exclusion)),
        ]),
    },
    Rule {
        id: ApplicationDecl,
        def: Seq(&[
            Tok(K::Application),
            Tok(K::LBrace),
            Star(&Alt(&[
                Ref(ConfigBlock),
                Ref(EntitiesBlock),
                Ref(UnaryOptionDecl),
                Ref(BinaryOptionDecl),
            ])),
            Tok(K::RBrace),
        ]),
    },
    Rule {
        id: ConfigBlock,
        def: Seq(&[
            Tok(K::Config),
            Tok(K::LBrace),
            Star(&Ref(ConfigItem)),
            Tok(K::RBrace),
        ]),
    },
    Rule {
        id: ConfigItem,
        def: Seq(&[Word, Ref(ConfigValue)]),
    },
    Rule {
        id: ConfigValue,
        def: Alt(&[
            Tok(K::Str),
            Tok(K::Decimal),
            Tok(K::Integer),
            Seq(&[
                Tok(K::LBracket),
                Opt(&Seq(&[Word, Star(&Seq(&[Tok(K::Comma), Word]))])),
                Tok(K::RBracket),
            ]),
            Word,
        ]),
    },
    Rule {
        id: EntitiesBlock,
        def: Seq(&[Tok(K::Entities), Ref(EntityList), Opt(&Ref(Exclusion))]),
    },
    Rule {
        id: DeploymentDecl,
        def: Seq(&[
            Tok(K::Deployment),
            Tok(K::LBrace),
            Star(&Ref(ConfigItem)),
            Tok(K::RBrace),
        ]),
    },
];

pub fn rule(id: RuleId) -> &'static Rule {
    &RULES[id as usize]
}
