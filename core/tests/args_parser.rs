use std::collections::BTreeMap;

use cmdroute_core::{
    ArgsFormat, ArgsFormatBuilder, ArgumentSpec, CommandName, CommandOption, OptionSpec,
    OptionValue, ParseError, RawArgs, Value, ValueType, parse_args,
};

fn name(name: &str) -> CommandName {
    CommandName::new(name, Vec::<String>::new()).unwrap()
}

fn aliased(name: &str, alias: &str) -> CommandName {
    CommandName::new(name, [alias]).unwrap()
}

fn command_option(long: &str, short: Option<&str>) -> CommandOption {
    let mut builder = CommandOption::builder(long);
    if let Some(short) = short {
        builder = builder.short_name(short);
    }
    builder.build().unwrap()
}

/// `server` followed by the `--add|-a` command option.
fn server_add() -> ArgsFormatBuilder {
    ArgsFormat::builder()
        .add_command_name(name("server"))
        .add_command_option(command_option("add", Some("a")))
        .unwrap()
}

/// `server` followed by the `add` command name.
fn server_add_names() -> ArgsFormatBuilder {
    ArgsFormat::builder()
        .add_command_name(name("server"))
        .add_command_name(name("add"))
}

fn with_arguments(builder: ArgsFormatBuilder, arguments: Vec<ArgumentSpec>) -> ArgsFormat {
    builder.add_arguments(arguments).unwrap().build()
}

fn with_option(builder: ArgsFormatBuilder, option: OptionSpec) -> ArgsFormat {
    builder.add_option(option).unwrap().build()
}

fn optional(name: &str) -> ArgumentSpec {
    ArgumentSpec::optional(name).unwrap()
}

fn required(name: &str) -> ArgumentSpec {
    ArgumentSpec::required(name).unwrap()
}

fn values(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn parse_error(line: &str, format: &ArgsFormat) -> ParseError {
    let raw = RawArgs::parse(line);
    parse_args(&raw, format, false).unwrap_err()
}

#[test]
fn test_parse_command_names_and_aliases() {
    let format = server_add_names().build();
    for line in ["server add", "", "server"] {
        let raw = RawArgs::parse(line);
        let args = parse_args(&raw, &format, false).unwrap();
        assert!(args.options(false).is_empty(), "input: {line:?}");
        assert!(args.arguments(false).is_empty(), "input: {line:?}");
    }

    let format = ArgsFormat::builder()
        .add_command_name(aliased("server", "server-alias"))
        .add_command_name(aliased("add", "add-alias"))
        .build();
    let raw = RawArgs::parse("server-alias add-alias");
    let args = parse_args(&raw, &format, false).unwrap();
    assert!(args.arguments(false).is_empty());
}

#[test]
fn test_parse_command_options() {
    let format = ArgsFormat::builder()
        .add_command_option(command_option("server", None))
        .unwrap()
        .add_command_option(command_option("add", Some("a")))
        .unwrap()
        .build();

    for line in ["--server --add", "--server -a", ""] {
        let raw = RawArgs::parse(line);
        let args = parse_args(&raw, &format, false).unwrap();
        assert!(args.options(false).is_empty(), "input: {line:?}");
        assert!(args.arguments(false).is_empty(), "input: {line:?}");
    }

    let raw = RawArgs::parse("--server -a");
    let args = parse_args(&raw, &format, false).unwrap();
    assert_eq!(args.selected_command_options(), ["server", "add"]);
}

#[test]
fn test_command_option_rejects_value() {
    let format = server_add().build();
    assert_eq!(
        parse_error("server --add=1", &format),
        ParseError::UnexpectedOptionValue("add".to_string())
    );
}

#[test]
fn test_parse_arguments() {
    let expected = values(&[("argument1", Value::from("foo")), ("argument2", Value::from("bar"))]);
    let cases = [
        (server_add(), "server --add foo bar"),
        (server_add_names(), "server foo bar"),
        (
            ArgsFormat::builder()
                .add_command_name(aliased("server", "server-alias"))
                .add_command_name(aliased("add", "add-alias")),
            "server-alias foo bar",
        ),
        (server_add(), "server foo bar"),
    ];

    for (builder, line) in cases {
        let format = with_arguments(builder, vec![optional("argument1"), optional("argument2")]);
        let raw = RawArgs::parse(line);
        let args = parse_args(&raw, &format, false).unwrap();
        assert!(args.options(false).is_empty(), "input: {line:?}");
        assert_eq!(args.arguments(false), expected, "input: {line:?}");
    }
}

#[test]
fn test_parse_ignores_missing_optional_arguments() {
    let format = with_arguments(server_add(), vec![optional("argument1"), optional("argument2")]);
    let raw = RawArgs::parse("server --add foo");
    let args = parse_args(&raw, &format, false).unwrap();
    assert_eq!(args.arguments(false), values(&[("argument1", Value::from("foo"))]));
    assert_eq!(args.argument("argument2").unwrap(), &Value::Null);
}

#[test]
fn test_missing_required_argument() {
    let cases = [
        (server_add(), "server --add foo"),
        (server_add_names(), "server foo"),
        (server_add(), "server foo"),
    ];
    for (builder, line) in cases {
        let format = with_arguments(builder, vec![required("argument1"), required("argument2")]);
        let raw = RawArgs::parse(line);

        let err = parse_args(&raw, &format, false).unwrap_err();
        assert_eq!(err, ParseError::NotEnoughArguments(vec!["argument2".to_string()]));
        assert!(err.to_string().starts_with("Not enough arguments"));

        let args = parse_args(&raw, &format, true).unwrap();
        assert!(args.options(false).is_empty());
        assert_eq!(args.arguments(false), values(&[("argument1", Value::from("foo"))]));
    }
}

#[test]
fn test_too_many_arguments() {
    let cases = [
        (server_add(), "server --add foo bar"),
        (server_add_names(), "server foo bar"),
        (server_add(), "server foo bar"),
    ];
    for (builder, line) in cases {
        let format = with_arguments(builder, vec![optional("argument")]);
        let raw = RawArgs::parse(line);

        let err = parse_args(&raw, &format, false).unwrap_err();
        assert_eq!(err, ParseError::TooManyArguments("bar".to_string()));
        assert!(err.to_string().starts_with("Too many arguments"));

        let args = parse_args(&raw, &format, true).unwrap();
        assert_eq!(args.arguments(false), values(&[("argument", Value::from("foo"))]));
    }
}

#[test]
fn test_parse_multi_valued_argument() {
    let multi = || ArgumentSpec::builder("multi").multi_valued().build().unwrap();
    let expected = values(&[("multi", Value::from(vec!["one", "two", "three"]))]);
    let cases = [
        (server_add(), "server --add one two three"),
        (server_add_names(), "server one two three"),
        (server_add(), "server one two three"),
    ];
    for (builder, line) in cases {
        let format = with_arguments(builder, vec![multi()]);
        let raw = RawArgs::parse(line);
        let args = parse_args(&raw, &format, false).unwrap();
        assert_eq!(args.arguments(false), expected, "input: {line:?}");
    }
}

#[test]
fn test_parse_long_options() {
    let flag = with_option(server_add(), OptionSpec::builder("option").build().unwrap());
    let raw = RawArgs::parse("server --add --option");
    let args = parse_args(&raw, &flag, false).unwrap();
    assert_eq!(args.options(false), values(&[("option", Value::Bool(true))]));
    assert!(args.arguments(false).is_empty());

    let optional_value = with_option(
        server_add(),
        OptionSpec::builder("option").value(OptionValue::Optional).build().unwrap(),
    );
    for line in ["server --add --option foo", "server --add --option=foo"] {
        let raw = RawArgs::parse(line);
        let args = parse_args(&raw, &optional_value, false).unwrap();
        assert_eq!(
            args.options(false),
            values(&[("option", Value::from("foo"))]),
            "input: {line:?}"
        );
    }
}

#[test]
fn test_parse_short_options() {
    let flag = with_option(
        server_add(),
        OptionSpec::builder("option").short_name("o").build().unwrap(),
    );
    let raw = RawArgs::parse("server --add -o");
    let args = parse_args(&raw, &flag, false).unwrap();
    assert_eq!(args.options(false), values(&[("option", Value::Bool(true))]));

    let optional_value = with_option(
        server_add(),
        OptionSpec::builder("option")
            .short_name("o")
            .value(OptionValue::Optional)
            .build()
            .unwrap(),
    );
    for line in ["server --add -o foo", "server --add -ofoo"] {
        let raw = RawArgs::parse(line);
        let args = parse_args(&raw, &optional_value, false).unwrap();
        assert_eq!(
            args.options(false),
            values(&[("option", Value::from("foo"))]),
            "input: {line:?}"
        );
    }
}

#[test]
fn test_option_requires_value() {
    let format = with_option(
        server_add(),
        OptionSpec::builder("option")
            .short_name("o")
            .value(OptionValue::Required)
            .build()
            .unwrap(),
    );
    for line in ["server --add --option", "server --add -o"] {
        let err = parse_error(line, &format);
        assert_eq!(err.to_string(), "The \"--option\" option requires a value.");
    }
}

#[test]
fn test_optional_value_without_value_uses_default() {
    let format = with_option(
        ArgsFormat::builder(),
        OptionSpec::builder("level")
            .value(OptionValue::Optional)
            .value_type(ValueType::Integer)
            .default_value(1)
            .build()
            .unwrap(),
    );
    let raw = RawArgs::parse("--level");
    let args = parse_args(&raw, &format, false).unwrap();
    assert!(args.is_option_set("level"));
    assert_eq!(args.option("level").unwrap(), &Value::Int(1));
}

#[test]
fn test_invalid_option() {
    let format = server_add().build();
    let err = parse_error("server --add --foo", &format);
    assert_eq!(err, ParseError::NoSuchOption("--foo".to_string()));
    assert_eq!(err.to_string(), "The \"--foo\" option does not exist.");

    let err = parse_error("server -x", &format);
    assert_eq!(err, ParseError::NoSuchOption("-x".to_string()));
}

#[test]
fn test_lenient_stops_at_invalid_option() {
    let format = with_arguments(server_add(), vec![optional("argument")]);

    let raw = RawArgs::parse("server --add --foo bar");
    let args = parse_args(&raw, &format, true).unwrap();
    assert!(args.options(false).is_empty());
    assert!(args.arguments(false).is_empty());

    let raw = RawArgs::parse("server --add bar --foo");
    let args = parse_args(&raw, &format, true).unwrap();
    assert_eq!(args.arguments(false), values(&[("argument", Value::from("bar"))]));
}

#[test]
fn test_parse_keeps_raw_args() {
    let format = ArgsFormat::builder().add_command_name(name("server")).build();
    let raw = RawArgs::parse("server");
    let args = parse_args(&raw, &format, false).unwrap();
    assert!(std::ptr::eq(args.raw_args(), &raw));
    assert!(std::ptr::eq(args.format(), &format));
}

#[test]
fn test_short_option_clusters() {
    let format = ArgsFormat::builder()
        .add_option(OptionSpec::builder("all").short_name("a").build().unwrap())
        .unwrap()
        .add_option(OptionSpec::builder("brief").short_name("b").build().unwrap())
        .unwrap()
        .add_option(
            OptionSpec::builder("columns")
                .short_name("c")
                .value(OptionValue::Required)
                .value_type(ValueType::Integer)
                .build()
                .unwrap(),
        )
        .unwrap()
        .build();

    let raw = RawArgs::parse("-abc80");
    let args = parse_args(&raw, &format, false).unwrap();
    assert_eq!(
        args.options(false),
        values(&[
            ("all", Value::Bool(true)),
            ("brief", Value::Bool(true)),
            ("columns", Value::Int(80)),
        ])
    );

    let raw = RawArgs::parse("-ba -c 40");
    let args = parse_args(&raw, &format, false).unwrap();
    assert_eq!(args.option("columns").unwrap(), &Value::Int(40));
}

#[test]
fn test_multi_valued_option_collects_occurrences() {
    let format = with_option(
        ArgsFormat::builder(),
        OptionSpec::builder("tag")
            .short_name("t")
            .value(OptionValue::Multi)
            .build()
            .unwrap(),
    );
    let raw = RawArgs::parse("--tag one -t two --tag=three");
    let args = parse_args(&raw, &format, false).unwrap();
    assert_eq!(args.option("tag").unwrap(), &Value::from(vec!["one", "two", "three"]));

    let raw = RawArgs::parse("");
    let args = parse_args(&raw, &format, false).unwrap();
    assert_eq!(args.option("tag").unwrap(), &Value::List(Vec::new()));
}

#[test]
fn test_double_dash_ends_options() {
    let format = ArgsFormat::builder()
        .add_option(OptionSpec::builder("force").short_name("f").build().unwrap())
        .unwrap()
        .add_argument(ArgumentSpec::builder("files").multi_valued().build().unwrap())
        .unwrap()
        .build();
    let raw = RawArgs::parse("-f -- --force -f");
    let args = parse_args(&raw, &format, false).unwrap();
    assert_eq!(args.option("force").unwrap(), &Value::Bool(true));
    assert_eq!(args.argument("files").unwrap(), &Value::from(vec!["--force", "-f"]));
}

#[test]
fn test_typed_argument_rejects_bad_value() {
    let format = ArgsFormat::builder()
        .add_argument(
            ArgumentSpec::builder("port")
                .required()
                .value_type(ValueType::Integer)
                .build()
                .unwrap(),
        )
        .unwrap()
        .build();

    let raw = RawArgs::parse("8080");
    let args = parse_args(&raw, &format, false).unwrap();
    assert_eq!(args.argument("port").unwrap(), &Value::Int(8080));

    let err = parse_error("http", &format);
    assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "port"));
    assert!(
        err.to_string()
            .contains("The value \"http\" cannot be converted to an integer.")
    );
}

#[test]
fn test_option_value_does_not_swallow_options() {
    let format = ArgsFormat::builder()
        .add_option(
            OptionSpec::builder("value")
                .short_name("v")
                .value(OptionValue::Optional)
                .build()
                .unwrap(),
        )
        .unwrap()
        .add_option(OptionSpec::builder("option").short_name("o").build().unwrap())
        .unwrap()
        .build();
    let raw = RawArgs::parse("-v -o");
    let args = parse_args(&raw, &format, false).unwrap();
    assert_eq!(args.option("value").unwrap(), &Value::Null);
    assert!(args.is_option_set("value"));
    assert_eq!(args.option("option").unwrap(), &Value::Bool(true));
}
