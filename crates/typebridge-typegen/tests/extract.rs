//! Integration tests for extraction policies.

use typebridge_typegen::{
    Arg, CaseStyle, DeclaredDocs, DeclaredEnums, EnumMember, ExtractConfig, ExtractError,
    HostModule, Member, TypeNode, extract_named,
    host::{HostField, HostMethod, HostType, TypeDecl},
};

fn load_fixture(name: &str) -> HostModule {
    let path = format!("tests/fixtures/{}.json", name);
    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("fixture {} not found", name));
    serde_json::from_str(&content).expect("invalid descriptor")
}

fn another_test_struct_members() -> Vec<Member> {
    vec![
        Member::field("Foo", TypeNode::string()),
        Member::field("Bar", TypeNode::boolean()),
    ]
}

fn names(graph: &[TypeNode]) -> Vec<&str> {
    graph.iter().map(TypeNode::name).collect()
}

#[test]
fn extract_struct_with_tags() {
    let module = load_fixture("structs");
    let graph = extract_named(&module, "MyTestStruct", &ExtractConfig::default()).unwrap();

    assert_eq!(
        graph,
        vec![TypeNode::interface(
            "MyTestStruct",
            vec![
                Member::field("StringField", TypeNode::string()),
                Member::field("OptionalField", TypeNode::string()).optional(),
                Member::field("thisFieldIsNamed", TypeNode::number()),
                Member::field("thisIsOptional", TypeNode::number()).optional(),
                Member::field("Containment", TypeNode::simple("AnotherTestStruct")),
                Member::field("Referece", TypeNode::simple("AnotherTestStruct")),
            ]
        )]
    );
}

#[test]
fn struct_of_all_kinds() {
    let module = load_fixture("structs");
    let graph = extract_named(&module, "StructOfAllKind", &ExtractConfig::default()).unwrap();

    assert_eq!(
        graph,
        vec![TypeNode::interface(
            "StructOfAllKind",
            vec![
                Member::field("BoolMember", TypeNode::boolean()),
                Member::field("StringArrayMember", TypeNode::array(TypeNode::string())),
                Member::field("Float32Member", TypeNode::number()),
                Member::field("Float64Member", TypeNode::number()),
                Member::field("IntMember", TypeNode::number()),
                Member::field("Int8Member", TypeNode::number()),
                Member::field("Uint16Member", TypeNode::number()),
                Member::field(
                    "MapMember",
                    TypeNode::map(TypeNode::string(), TypeNode::number())
                ),
                Member::field("PtrMember", TypeNode::string()),
                Member::field("FixedMember", TypeNode::array(TypeNode::number())),
                Member::field(
                    "AnonStruct",
                    TypeNode::interface(
                        "",
                        vec![
                            Member::field("AnonymousMember", TypeNode::string()),
                            Member::field("AnotherAnonMember", TypeNode::number()),
                        ]
                    )
                ),
            ]
        )]
    );
}

#[test]
fn name_anon_structs() {
    let module = load_fixture("structs");
    let config = ExtractConfig::builder()
        .name_anon_structs_with(|field| field.name.clone())
        .build()
        .unwrap();
    let graph = extract_named(&module, "NestedStruct", &config).unwrap();

    assert_eq!(
        graph,
        vec![
            TypeNode::interface("Anon", vec![Member::field("Foo", TypeNode::string())]),
            TypeNode::interface(
                "NestedStruct",
                vec![
                    Member::field("Contains", TypeNode::simple("AnotherTestStruct")),
                    Member::field("Refers", TypeNode::simple("AnotherTestStruct")),
                    Member::field("Anon", TypeNode::simple("Anon")),
                ]
            ),
        ]
    );
}

#[test]
fn follow_structs() {
    let module = load_fixture("structs");
    let config = ExtractConfig::builder().follow_structs(true).build().unwrap();
    let graph = extract_named(&module, "NestedStruct", &config).unwrap();

    assert_eq!(
        graph,
        vec![
            TypeNode::interface("AnotherTestStruct", another_test_struct_members()),
            TypeNode::interface(
                "NestedStruct",
                vec![
                    Member::field("Contains", TypeNode::simple("AnotherTestStruct")),
                    Member::field("Refers", TypeNode::simple("AnotherTestStruct")),
                    Member::field(
                        "Anon",
                        TypeNode::interface("", vec![Member::field("Foo", TypeNode::string())])
                    ),
                ]
            ),
        ]
    );
}

#[test]
fn embed_structs() {
    let module = load_fixture("structs");
    let config = ExtractConfig::builder().embed_structs(true).build().unwrap();
    let graph = extract_named(&module, "NestedStruct", &config).unwrap();

    let inline = TypeNode::interface("", another_test_struct_members());
    assert_eq!(
        graph,
        vec![TypeNode::interface(
            "NestedStruct",
            vec![
                Member::field("Contains", inline.clone()),
                Member::field("Refers", inline),
                Member::field(
                    "Anon",
                    TypeNode::interface("", vec![Member::field("Foo", TypeNode::string())])
                ),
            ]
        )]
    );
}

#[test]
fn extract_interface() {
    let module = load_fixture("structs");
    let graph = extract_named(&module, "MyInterface", &ExtractConfig::default()).unwrap();

    assert_eq!(
        graph,
        vec![TypeNode::interface(
            "MyInterface",
            vec![
                Member::method(
                    "FirstOp",
                    TypeNode::number(),
                    vec![Arg::new("arg0", TypeNode::simple("MyTestStruct"))]
                ),
                Member::method(
                    "SecondOp",
                    TypeNode::simple("StructOfAllKind"),
                    vec![
                        Arg::new("arg0", TypeNode::number()),
                        Arg::new("arg1", TypeNode::simple("StructOfAllKind")),
                    ]
                ),
                Member::method("VoidOp", TypeNode::Void, vec![]),
                Member::method("FailOp", TypeNode::Void, vec![]),
            ]
        )]
    );
}

#[test]
fn interface_with_follow_structs_discovers_dependencies_first() {
    let module = load_fixture("structs");
    let config = ExtractConfig::builder().follow_structs(true).build().unwrap();
    let graph = extract_named(&module, "MyInterface", &config).unwrap();

    assert_eq!(
        names(&graph),
        [
            "AnotherTestStruct",
            "MyTestStruct",
            "StructOfAllKind",
            "MyInterface"
        ]
    );
}

#[test]
fn preserve_param_names() {
    let module = load_fixture("structs");
    let config = ExtractConfig::builder()
        .preserve_param_names(true)
        .build()
        .unwrap();
    let graph = extract_named(&module, "MyInterface", &config).unwrap();

    let TypeNode::Interface(iface) = &graph[0] else {
        panic!("expected interface");
    };
    let args: Vec<&str> = iface.members[1]
        .args
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(args, ["count", "all"]);
    assert_eq!(iface.members[0].args[0].name, "arg");
}

#[test]
fn documentation() {
    let module = load_fixture("structs");
    let config = ExtractConfig::builder()
        .docs(DeclaredDocs)
        .follow_structs(true)
        .build()
        .unwrap();
    let graph = extract_named(&module, "MyInterface", &config).unwrap();

    let Some(TypeNode::Interface(iface)) = graph.last() else {
        panic!("expected interface");
    };
    assert_eq!(
        iface.comment.as_deref(),
        Some("MyInterface has this documentation")
    );
    assert_eq!(
        iface.members[0].comment.as_deref(),
        Some("FirstOp takes a struct")
    );
    assert_eq!(iface.members[1].comment, None);

    let TypeNode::Interface(another) = &graph[0] else {
        panic!("expected interface");
    };
    assert_eq!(
        another.comment.as_deref(),
        Some("AnotherTestStruct is just yet another struct")
    );
}

#[test]
fn enums() {
    let module = load_fixture("structs");
    let config = ExtractConfig::builder().enums(DeclaredEnums).build().unwrap();
    let graph = extract_named(&module, "StructWithEnum", &config).unwrap();

    assert_eq!(
        graph,
        vec![
            TypeNode::enumeration(
                "MyEnum",
                vec![
                    EnumMember::string("MemberOne", "member-one"),
                    EnumMember::string("MemberTwo", "member-two"),
                    EnumMember::string("MemberThree", "member-three"),
                ]
            ),
            TypeNode::enumeration(
                "MyOtherEnum",
                vec![
                    EnumMember::integer("OtherEnumOne", 0),
                    EnumMember::integer("OtherEnumTwo", 1),
                    EnumMember::integer("OtherEnumThree", 2),
                    EnumMember::integer("OtherEnumFour", 3),
                ]
            ),
            TypeNode::interface(
                "StructWithEnum",
                vec![
                    Member::field("Foo", TypeNode::simple("MyEnum")),
                    Member::field("Bar", TypeNode::simple("MyOtherEnum")),
                    Member::field("Baz", TypeNode::string()),
                ]
            ),
        ]
    );
}

#[test]
fn sort_alphabetically() {
    let module = load_fixture("structs");
    let config = ExtractConfig::builder()
        .enums(DeclaredEnums)
        .sort_alphabetically()
        .build()
        .unwrap();
    let graph = extract_named(&module, "StructWithEnum", &config).unwrap();

    assert_eq!(names(&graph), ["MyEnum", "MyOtherEnum", "StructWithEnum"]);
    let TypeNode::Enum(my_enum) = &graph[0] else {
        panic!("expected enum");
    };
    let members: Vec<&str> = my_enum.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(members, ["MemberOne", "MemberThree", "MemberTwo"]);

    let TypeNode::Interface(iface) = &graph[2] else {
        panic!("expected interface");
    };
    let fields: Vec<&str> = iface.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(fields, ["Bar", "Baz", "Foo"]);
}

#[test]
fn custom_type_naming() {
    let module = load_fixture("structs");
    let config = ExtractConfig::builder()
        .follow_structs(true)
        .type_naming(CaseStyle::Snake)
        .build()
        .unwrap();
    let graph = extract_named(&module, "NestedStruct", &config).unwrap();
    assert_eq!(names(&graph), ["another_test_struct", "nested_struct"]);

    let config = ExtractConfig::builder()
        .type_namer(|decl| format!("I{}", decl.name))
        .build()
        .unwrap();
    let graph = extract_named(&module, "NestedStruct", &config).unwrap();
    let TypeNode::Interface(iface) = &graph[0] else {
        panic!("expected interface");
    };
    assert_eq!(iface.name, "INestedStruct");
    assert_eq!(iface.members[0].ty, TypeNode::simple("IAnotherTestStruct"));
}

#[test]
fn extraction_is_idempotent() {
    let module = load_fixture("structs");
    let config = ExtractConfig::builder()
        .follow_structs(true)
        .enums(DeclaredEnums)
        .docs(DeclaredDocs)
        .build()
        .unwrap();

    let first = extract_named(&module, "MyInterface", &config).unwrap();
    let second = extract_named(&module, "MyInterface", &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn mutually_referential_structs_terminate() {
    let module = HostModule::new()
        .with(TypeDecl::new(
            "Parent",
            HostType::structure(vec![HostField::new(
                "Children",
                HostType::slice(HostType::pointer(HostType::named("Child"))),
            )]),
        ))
        .with(TypeDecl::new(
            "Child",
            HostType::structure(vec![HostField::new(
                "Parent",
                HostType::pointer(HostType::named("Parent")),
            )]),
        ));
    let config = ExtractConfig::builder().follow_structs(true).build().unwrap();
    let graph = extract_named(&module, "Parent", &config).unwrap();

    assert_eq!(
        graph,
        vec![
            TypeNode::interface(
                "Child",
                vec![Member::field("Parent", TypeNode::simple("Parent"))]
            ),
            TypeNode::interface(
                "Parent",
                vec![Member::field(
                    "Children",
                    TypeNode::array(TypeNode::simple("Child"))
                )]
            ),
        ]
    );
}

#[test]
fn anonymous_struct_in_slice_is_inlined_even_when_naming() {
    let module = HostModule::new().with(TypeDecl::new(
        "Batch",
        HostType::structure(vec![HostField::new(
            "Items",
            HostType::slice(HostType::structure(vec![HostField::new(
                "Id",
                HostType::String,
            )])),
        )]),
    ));
    let config = ExtractConfig::builder()
        .name_anon_structs_with(|field| field.name.clone())
        .build()
        .unwrap();
    let graph = extract_named(&module, "Batch", &config).unwrap();

    assert_eq!(
        graph,
        vec![TypeNode::interface(
            "Batch",
            vec![Member::field(
                "Items",
                TypeNode::array(TypeNode::interface(
                    "",
                    vec![Member::field("Id", TypeNode::string())]
                ))
            )]
        )]
    );
}

#[test]
fn method_shape_errors() {
    let shape = |method: HostMethod| {
        HostModule::new().with(TypeDecl::new("Api", HostType::interface(vec![method])))
    };
    let config = ExtractConfig::default();

    let err = extract_named(
        &shape(HostMethod::new(
            "Pair",
            vec![],
            vec![HostType::String, HostType::int()],
        )),
        "Api",
        &config,
    )
    .unwrap_err();
    assert!(matches!(
        &err,
        ExtractError::InvalidReturnShape { type_name, method } if type_name == "Api" && method == "Pair"
    ));

    let err = extract_named(
        &shape(HostMethod::new(
            "Triple",
            vec![],
            vec![HostType::String, HostType::int(), HostType::Error],
        )),
        "Api",
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, ExtractError::TooManyReturnValues { .. }));

    let err = extract_named(
        &shape(HostMethod::new("Many", vec![HostType::slice(HostType::String)], vec![]).variadic()),
        "Api",
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedVariadic { .. }));
    assert_eq!(err.to_string(), "variadic methods are not supported: Api.Many");

    let err = extract_named(
        &shape(HostMethod::new(
            "Stream",
            vec![],
            vec![HostType::Chan {
                elem: Box::new(HostType::String),
            }],
        )),
        "Api",
        &config,
    )
    .unwrap_err();
    assert!(matches!(
        &err,
        ExtractError::UnsupportedKind { kind: "chan", site } if site == "Api.Stream"
    ));
}

#[test]
fn unknown_reference_is_reported() {
    let module = HostModule::new().with(TypeDecl::new(
        "Orphan",
        HostType::structure(vec![HostField::new("Ghost", HostType::named("Missing"))]),
    ));

    let err = extract_named(&module, "Orphan", &ExtractConfig::default()).unwrap_err();
    assert!(matches!(
        &err,
        ExtractError::UnknownType { name, site } if name == "Missing" && site == "Orphan.Ghost"
    ));
}
