//! Common test utilities

#![allow(dead_code)]

use cmdlex::catalog::{
    Call, CommandGroup, CompositeType, EnumType, FieldSpec, Literal, Operation, ParamType,
    ParameterSpec, Returned, Value,
};
use cmdlex::config::Settings;
use cmdlex::runner::{InvocationResult, Runner, SharedBuffer};
use std::sync::Arc;

/// Outcome of a run with captured sinks
pub struct Captured {
    pub result: InvocationResult,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Arguments the operation received, as returned by [`echo`]
    pub fn values(&self) -> &[Value] {
        self.result
            .value
            .as_ref()
            .and_then(Value::as_items)
            .expect("operation did not echo its arguments")
    }

    pub fn value(&self, index: usize) -> &Value {
        &self.values()[index]
    }
}

/// Run a whitespace separated line, prefixed with a program name
pub fn run(groups: Vec<Arc<CommandGroup>>, line: &str) -> Captured {
    let mut args = vec!["prog"];
    args.extend(line.split_whitespace());
    run_args(groups, &args)
}

/// Run pre-split arguments, program name included
pub fn run_args(groups: Vec<Arc<CommandGroup>>, args: &[&str]) -> Captured {
    run_with(Runner::configure().with_groups(groups), Settings::default(), args)
}

pub fn run_with(builder: cmdlex::RunnerBuilder, settings: Settings, args: &[&str]) -> Captured {
    let stdout = SharedBuffer::new();
    let stderr = SharedBuffer::new();

    let result = builder
        .with_settings(settings)
        .with_stdout(stdout.clone())
        .with_stderr(stderr.clone())
        .run(args.iter().copied())
        .expect("run failed");

    Captured {
        result,
        stdout: stdout.contents(),
        stderr: stderr.contents(),
    }
}

/// Handler returning every bound argument as a list
pub fn echo(mut call: Call<'_>) -> anyhow::Result<Returned> {
    let values = (0..call.len()).map(|i| call.take(i)).collect();
    Ok(Value::List(values).into())
}

pub fn days() -> Arc<EnumType> {
    Arc::new(EnumType::new(
        "DayOfWeek",
        &["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"],
    ))
}

fn day(name: &str) -> Literal {
    Literal::Text(name.to_string())
}

/// A group whose operations cover one parameter shape each
pub fn e1() -> Vec<Arc<CommandGroup>> {
    let days = days();
    let op = |name: &str| Operation::instance(name, echo);
    let p = ParameterSpec::new;

    vec![CommandGroup::new("tests.E1")
        .factory(|| ())
        .operation(op("O1").param(p("s", ParamType::string())))
        .operation(op("O2").param(p("i", ParamType::int32())))
        .operation(op("O3").param(p("i", ParamType::nullable(ParamType::int32()))))
        .operation(op("O4").param(p("d", ParamType::enumeration(days.clone()))))
        .operation(op("O5").param(p("d", ParamType::nullable(ParamType::enumeration(days.clone())))))
        .operation(op("O6").param(
            p("d", ParamType::nullable(ParamType::enumeration(days.clone()))).with_default(day("Friday")),
        ))
        .operation(
            op("O7")
                .param(p("d", ParamType::date_time()))
                .param(p("w", ParamType::nullable(ParamType::enumeration(days.clone()))).with_default(day("Friday"))),
        )
        .operation(op("O8").param(p("s", ParamType::Stream)))
        .operation(op("O9").param(p("s", ParamType::Stream).with_default(Literal::Null)))
        .operation(op("OA").param(p("t", ParamType::TextReader)))
        .operation(op("OB").param(p("f", ParamType::FilePath)))
        .operation(op("OC").param(p("d", ParamType::DirectoryPath)))
        .operation(op("OD").param(p("t", ParamType::TextWriter)))
        .operation(op("OE").param(p("a", ParamType::string())).param(p("b", ParamType::string())))
        .operation(op("OF").param(p("ss", ParamType::array(ParamType::string()))))
        .operation(
            op("OG")
                .param(p("d", ParamType::list(ParamType::enumeration(days))))
                .param(p("n", ParamType::int32()).with_default(Literal::Int(0))),
        )
        .build()]
}

/// Two groups with the same operation name
pub fn hello_and_greetings() -> Vec<Arc<CommandGroup>> {
    let world = || {
        Operation::instance("World", |_| {
            Ok(Value::String("and all who inhabit it".to_string()).into())
        })
    };
    vec![
        CommandGroup::new("tests.Hello").factory(|| ()).operation(world()).build(),
        CommandGroup::new("tests.Greetings").factory(|| ()).operation(world()).build(),
    ]
}

/// Operations taking a nested parameter object
pub fn objects() -> Vec<Arc<CommandGroup>> {
    let bc = Arc::new(CompositeType::new(
        "BC",
        vec![
            FieldSpec::new("Foo", ParamType::int32()),
            FieldSpec::new("Bar", ParamType::string()),
        ],
    ));
    let cc = Arc::new(CompositeType::new(
        "CC",
        vec![
            FieldSpec::new("Foo", ParamType::int32()).with_default(Literal::Int(5)),
            FieldSpec::new("Bar", ParamType::string()).describe("This is bar"),
        ],
    ));

    vec![CommandGroup::new("tests.A")
        .operation(Operation::associated("B", echo).param(ParameterSpec::new("bc", ParamType::composite(bc))))
        .operation(Operation::associated("C", echo).param(ParameterSpec::new("cc", ParamType::composite(cc))))
        .build()]
}
