use pretty_assertions::assert_eq;
use simple_query::prelude::*;

/// `$N` suffixes in emission order.
fn postgres_positions(sql: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut chars = sql.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c != '$' {
            continue;
        }
        let mut digits = String::new();
        while let Some(&(_, d)) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits.push(d);
            chars.next();
        }
        positions.push(digits.parse().expect("placeholder without index"));
    }
    positions
}

/// Replace every placeholder with `?` and postgres spellings with mysql ones.
fn normalize(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' {
            while chars.peek().is_some_and(char::is_ascii_digit) {
                chars.next();
            }
            out.push('?');
        } else {
            out.push(c);
        }
    }
    out.replace(" ilike ", " like ")
}

fn nested_tree() -> Filter {
    Filter::and([
        Filter::condition("field1", Operator::Equal, "value1"),
        Filter::or([
            Filter::is_null("field2"),
            Filter::condition("field3", Operator::In, [1, 2, 3]),
        ]),
        Filter::condition("field4", Operator::Like, "value4"),
    ])
}

#[test]
fn test_leaf_mysql() {
    let filter = Filter::condition("field1", Operator::Equal, "value1");
    let (sql, args) = filter.to_sql_with_args(Dialect::MySQL, vec![]).unwrap();
    assert_eq!(sql, "field1 = ?");
    assert_eq!(args, vec![Value::from("value1")]);
}

#[test]
fn test_leaf_postgres_continues_numbering() {
    let filter = Filter::condition("field1", Operator::Equal, "value1");
    let (sql, args) = filter
        .to_sql_with_args(Dialect::Postgres, vec![Value::from("x")])
        .unwrap();
    assert_eq!(sql, "field1 = $2");
    assert_eq!(args, vec![Value::from("x"), Value::from("value1")]);
}

#[test]
fn test_nested_logic_mysql() {
    let (sql, args) = nested_tree()
        .compile_nested(&CompileContext::new(Dialect::MySQL), vec![])
        .unwrap();
    assert_eq!(
        sql,
        "(field1 = ? and (field2 is null or field3 in (?, ?, ?)) and field4 like concat('%', ?, '%'))"
    );
    assert_eq!(
        args,
        vec![
            Value::from("value1"),
            Value::from(1),
            Value::from(2),
            Value::from(3),
            Value::from("value4"),
        ]
    );
}

#[test]
fn test_qualified_field() {
    let field = Field::new("f").from_table("t");
    let (sql, args) = field.to_sql_with_args(Dialect::MySQL, vec![]).unwrap();
    assert_eq!(sql, "t.f");
    assert!(args.is_empty());
}

#[test]
fn test_derived_table() {
    let table = Table::subquery(select(["f"]).from("t")).alias("a");
    let ctx = CompileContext::new(Dialect::Postgres);
    let (sql, args) = table.to_sql_with_alias(&ctx, vec![]).unwrap();
    assert_eq!(sql, "(select f from t) as a");
    assert!(args.is_empty());
}

#[test]
fn test_in_with_empty_list() {
    let filter = Filter::condition("field1", Operator::In, Vec::<i64>::new());
    let err = filter.to_sql_with_args(Dialect::MySQL, vec![]).unwrap_err();
    assert_eq!(err, QueryError::ValueIsRequired);
    assert_eq!(err.to_string(), "value is required");
}

#[test]
fn test_placeholder_count_matches_arguments() {
    let leaves = [
        (Filter::is_null("a"), 0),
        (Filter::is_not_null("a"), 0),
        (Filter::condition("a", Operator::NotEqual, 1), 1),
        (Filter::condition("a", Operator::NotLike, "x"), 1),
        (Filter::condition("a", Operator::NotIn, ["x", "y", "z", "w"]), 4),
    ];

    for (leaf, expected) in leaves {
        for dialect in Dialect::ALL {
            let (sql, args) = leaf.to_sql_with_args(dialect, vec![]).unwrap();
            let placeholders = match dialect {
                Dialect::MySQL => sql.matches('?').count(),
                Dialect::Postgres => postgres_positions(&sql).len(),
            };
            assert_eq!(placeholders, expected, "{sql}");
            assert_eq!(args.len(), expected, "{sql}");
        }
    }
}

#[test]
fn test_postgres_positions_follow_argument_order() {
    let inner = select(["id"])
        .from("orders")
        .where_(Filter::condition("total", Operator::GreaterThan, 100))
        .limit(5);

    let counted = select(["count(*)"])
        .from("items")
        .where_(Filter::condition("kind", Operator::In, ["a", "b"]));
    let active = select(["id"]).from("users").where_(Filter::is_not_null("email"));

    let query = select([Field::new("id"), Field::subquery(counted).alias("item_count")])
        .from(Table::subquery(active).alias("u"))
        .where_(Filter::and([
            Filter::condition("name", Operator::Like, "ann"),
            Filter::or([
                Filter::condition_with("id", Operator::In, FilterValue::subquery(inner)),
                Filter::condition("age", Operator::LessThanOrEqual, 30),
            ]),
        ]))
        .limit(10);

    let (sql, args) = query.build_sql(Dialect::Postgres).unwrap();
    let positions = postgres_positions(&sql);
    assert_eq!(positions, (1..=args.len()).collect::<Vec<_>>());
    assert_eq!(
        args,
        vec![
            Value::from("a"),
            Value::from("b"),
            Value::from("ann"),
            Value::from(100),
            Value::UInt(5),
            Value::from(30),
            Value::UInt(10),
        ]
    );
}

#[test]
fn test_root_and_nested_parenthesization() {
    let tree = nested_tree();
    let ctx = CompileContext::new(Dialect::Postgres);

    let (root, root_args) = tree.compile(&ctx, vec![]).unwrap();
    let (nested, nested_args) = tree.compile_nested(&ctx, vec![]).unwrap();

    assert!(!root.starts_with('('));
    assert_eq!(nested, format!("({root})"));
    assert_eq!(root_args, nested_args);
}

#[test]
fn test_structure_is_dialect_independent() {
    let tree = nested_tree().add_optional(Some(Filter::condition("field5", Operator::NotIn, [true, false])));

    let (mysql, mysql_args) = tree.to_sql_with_args(Dialect::MySQL, vec![]).unwrap();
    let (postgres, postgres_args) = tree.to_sql_with_args(Dialect::Postgres, vec![]).unwrap();

    assert_eq!(normalize(&postgres), normalize(&mysql));
    assert_eq!(mysql_args, postgres_args);
}

#[test]
fn test_empty_children_are_skipped() {
    let filter = Filter::new().set_logic(Logic::And).add_optional(None).add_optional(None);
    let seed = vec![Value::from("kept")];

    for dialect in Dialect::ALL {
        let (sql, args) = filter.to_sql_with_args(dialect, seed.clone()).unwrap();
        assert_eq!(sql, "");
        assert_eq!(args, seed);

        let (sql, args) = filter
            .compile_nested(&CompileContext::new(dialect), seed.clone())
            .unwrap();
        assert_eq!(sql, "");
        assert_eq!(args, seed);
    }

    let mixed = Filter::or([Filter::is_null("a")]).add_optional(None);
    let (sql, _) = mixed.to_sql_with_args(Dialect::MySQL, vec![]).unwrap();
    assert_eq!(sql, "a is null");
}

#[test]
fn test_errors_return_no_fragment() {
    let filter = Filter::and([
        Filter::condition("ok", Operator::Equal, 1),
        Filter::condition("bad", Operator::Like, [1, 2]),
    ]);
    let err = filter.to_sql_with_args(Dialect::MySQL, vec![]).unwrap_err();
    assert_eq!(err.to_string(), "unsupported slice value type for operator like");
}

#[test]
fn test_depth_limit_from_options() {
    let mut filter = Filter::is_null("leaf");
    for _ in 0..10 {
        filter = Filter::and([filter]);
    }

    let options = CompileOptions { max_depth: 4, max_take: None };
    let err = filter
        .to_sql_with_options(Dialect::MySQL, options, vec![])
        .unwrap_err();
    assert_eq!(err, QueryError::MaxDepthExceeded(4));

    assert!(filter.to_sql_with_args(Dialect::MySQL, vec![]).is_ok());
}

#[test]
fn test_document_to_sql() {
    let document = Document::from_json(
        r#"{
            "select": {
                "fields": ["id", {"column": "name", "table": "u"}],
                "table": {"name": "users", "alias": "u"},
                "where": {
                    "logic": "and",
                    "filters": [
                        {"field": "active", "operator": "equal", "value": true},
                        null,
                        {"field": "role", "operator": "in", "value": ["admin", "staff"]}
                    ]
                },
                "order_by": [{"field": "id", "direction": "desc"}],
                "limit": 20
            }
        }"#,
    )
    .unwrap();

    let statement = document.into_statement().unwrap();
    let (sql, args) = statement.build_sql(Dialect::Postgres).unwrap();
    assert_eq!(
        sql,
        "select id, u.name from users as u where active = $1 and role in ($2, $3) order by id desc limit $4"
    );
    assert_eq!(
        args,
        vec![Value::Bool(true), Value::from("admin"), Value::from("staff"), Value::UInt(20)]
    );
}
