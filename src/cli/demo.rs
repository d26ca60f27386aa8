//! Bundled demo catalog
//!
//! A small set of groups that exercises every kind of parameter the engine
//! understands. The `cmdlex` binary runs against this catalog.

use crate::catalog::{
    Call, CommandGroup, CompositeType, EnumType, EnumValue, FieldSpec, Literal, Operation, ParamType,
    ParameterSpec, ReturnKind, Returned, Value,
};
use anyhow::{anyhow, bail, Context};
use chrono::{Datelike, Duration, Local, NaiveDateTime};
use std::fs;
use std::io::{BufRead, Write};
use std::sync::Arc;

const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Every demo group, in registration order
pub fn catalog() -> Vec<Arc<CommandGroup>> {
    vec![calendar(), greetings(), files()]
}

fn weekdays() -> Arc<EnumType> {
    Arc::new(EnumType::new("DayOfWeek", &DAYS))
}

fn calendar() -> Arc<CommandGroup> {
    let days = weekdays();
    let span = Arc::new(CompositeType::new(
        "Span",
        vec![
            FieldSpec::new("start", ParamType::date_time()).describe("First day of the span"),
            FieldSpec::new("length", ParamType::int32())
                .with_default(Literal::Int(7))
                .describe("Number of days"),
        ],
    ));

    CommandGroup::new("demo.Calendar")
        .describe("Weekday arithmetic")
        .operation(
            Operation::associated("Next", next)
                .param(ParameterSpec::new("day", ParamType::enumeration(days.clone())))
                .param(
                    ParameterSpec::new("from", ParamType::nullable(ParamType::date_time()))
                        .with_default(Literal::Null)
                        .describe("Start searching after this date, today when omitted"),
                )
                .returns(ReturnKind::Value)
                .describe("Date of the next occurrence of a weekday"),
        )
        .operation(
            Operation::associated("DayOf", day_of)
                .param(ParameterSpec::new("date", ParamType::date_time()))
                .returns(ReturnKind::Value)
                .describe("Weekday a date falls on"),
        )
        .operation(
            Operation::associated("Sort", sort)
                .param(ParameterSpec::new("days", ParamType::array(ParamType::enumeration(days))))
                .returns(ReturnKind::Value)
                .describe("Put weekdays in calendar order"),
        )
        .operation(
            Operation::associated("Span", span_dates)
                .param(ParameterSpec::new("span", ParamType::composite(span)))
                .returns(ReturnKind::Value)
                .describe("Consecutive dates of a span"),
        )
        .build()
}

fn next(call: Call<'_>) -> anyhow::Result<Returned> {
    let day = call
        .get(0)
        .and_then(Value::as_enum)
        .ok_or_else(|| anyhow!("no weekday given"))?;
    let from = call
        .get(1)
        .and_then(Value::as_date_time)
        .unwrap_or_else(|| Local::now().naive_local());

    let current = i64::from(from.weekday().num_days_from_sunday());
    let ahead = match (day.value - current).rem_euclid(7) {
        0 => 7,
        n => n,
    };

    Ok(Value::DateTime(from + Duration::days(ahead)).into())
}

fn day_of(call: Call<'_>) -> anyhow::Result<Returned> {
    let date = call
        .get(0)
        .and_then(Value::as_date_time)
        .ok_or_else(|| anyhow!("no date given"))?;
    Ok(Value::Enum(weekday_value(&date)).into())
}

fn weekday_value(date: &NaiveDateTime) -> EnumValue {
    let index = date.weekday().num_days_from_sunday() as usize;
    EnumValue {
        type_name: "DayOfWeek".to_string(),
        name: DAYS[index].to_string(),
        value: index as i64,
    }
}

fn sort(call: Call<'_>) -> anyhow::Result<Returned> {
    let mut days: Vec<EnumValue> = call
        .get(0)
        .and_then(Value::as_items)
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_enum)
        .cloned()
        .collect();
    days.sort_by_key(|d| d.value);
    days.dedup();

    Ok(Value::List(days.into_iter().map(Value::Enum).collect()).into())
}

fn span_dates(call: Call<'_>) -> anyhow::Result<Returned> {
    let span = call
        .get(0)
        .and_then(Value::as_record)
        .ok_or_else(|| anyhow!("no span given"))?;
    let start = span
        .get("start")
        .and_then(Value::as_date_time)
        .ok_or_else(|| anyhow!("a span needs a start date"))?;
    let length = span.get("length").and_then(Value::as_i64).unwrap_or(0);
    if length < 0 {
        bail!("a span cannot have a negative length");
    }

    let dates = (0..length)
        .map(|offset| Value::DateTime(start + Duration::days(offset)))
        .collect();
    Ok(Value::List(dates).into())
}

/// Instance state of the greetings group
#[derive(Debug, Default)]
pub struct Greeter {
    pub greeted: usize,
}

fn greetings() -> Arc<CommandGroup> {
    CommandGroup::new("demo.Greetings")
        .describe("Friendly messages")
        .factory(Greeter::default)
        .operation(
            Operation::instance("Hello", hello)
                .param(
                    ParameterSpec::new("name", ParamType::string())
                        .with_default(Literal::Text("World".to_string())),
                )
                .param(ParameterSpec::new("loud", ParamType::boolean()).with_default(Literal::Bool(false)))
                .returns(ReturnKind::Value)
                .describe("Greet someone"),
        )
        .operation(
            Operation::instance("Everyone", everyone)
                .param(
                    ParameterSpec::new("names", ParamType::list(ParamType::string()))
                        .describe("People to greet"),
                )
                .returns(ReturnKind::Value)
                .describe("Greet a whole list of people"),
        )
        .operation(
            Operation::associated("Later", later)
                .param(
                    ParameterSpec::new("name", ParamType::string())
                        .with_default(Literal::Text("World".to_string())),
                )
                .returns(ReturnKind::Deferred)
                .describe("Greet someone asynchronously"),
        )
        .operation(
            Operation::associated("Fail", fail)
                .param(
                    ParameterSpec::new("message", ParamType::string())
                        .with_default(Literal::Text("something went wrong".to_string())),
                )
                .describe("Always fails"),
        )
        .build()
}

fn hello(mut call: Call<'_>) -> anyhow::Result<Returned> {
    let name = call.get(0).and_then(Value::as_str).unwrap_or("World").to_string();
    let loud = call.get(1).and_then(Value::as_bool).unwrap_or(false);

    let greeter = call.instance::<Greeter>()?;
    greeter.greeted += 1;

    let message = format!("Hello, {}!", name);
    let message = if loud { message.to_uppercase() } else { message };
    Ok(Value::String(message).into())
}

fn everyone(mut call: Call<'_>) -> anyhow::Result<Returned> {
    let names: Vec<String> = call
        .get(0)
        .and_then(Value::as_items)
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();

    let greeter = call.instance::<Greeter>()?;
    greeter.greeted += names.len();

    let message = match names.split_last() {
        None => "Hello, nobody!".to_string(),
        Some((last, [])) => format!("Hello, {}!", last),
        Some((last, rest)) => format!("Hello, {} and {}!", rest.join(", "), last),
    };
    Ok(Value::String(message).into())
}

fn later(call: Call<'_>) -> anyhow::Result<Returned> {
    let name = call.get(0).and_then(Value::as_str).unwrap_or("World").to_string();
    Ok(Returned::deferred(async move {
        Ok(Value::String(format!("Hello, {}!", name)))
    }))
}

fn fail(call: Call<'_>) -> anyhow::Result<Returned> {
    let message = call.get(0).and_then(Value::as_str).unwrap_or_default();
    Err(anyhow!("{}", message))
}

fn files() -> Arc<CommandGroup> {
    CommandGroup::new("demo.Files")
        .describe("Reading and writing text")
        .operation(
            Operation::associated("Lines", lines)
                .param(ParameterSpec::new("input", ParamType::TextReader).describe("File to read, - for stdin"))
                .returns(ReturnKind::Value)
                .describe("Count the lines of a text"),
        )
        .operation(
            Operation::associated("Write", write)
                .param(
                    ParameterSpec::new("output", ParamType::TextWriter)
                        .describe("New file to create, - for stdout"),
                )
                .param(ParameterSpec::new("text", ParamType::array(ParamType::string())))
                .describe("Write one line per value"),
        )
        .operation(
            Operation::associated("Size", size)
                .param(ParameterSpec::new("file", ParamType::FilePath))
                .returns(ReturnKind::Value)
                .describe("Size of a file in bytes"),
        )
        .build()
}

fn lines(mut call: Call<'_>) -> anyhow::Result<Returned> {
    let Value::TextReader(reader) = call.take(0) else {
        bail!("no input given");
    };

    let mut count = 0;
    for line in reader.lines() {
        line.context("failed to read input")?;
        count += 1;
    }
    Ok(Value::Int(count).into())
}

fn write(mut call: Call<'_>) -> anyhow::Result<Returned> {
    let Value::TextWriter(mut writer) = call.take(0) else {
        bail!("no output given");
    };

    for line in call.get(1).and_then(Value::as_items).unwrap_or_default() {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(Returned::Unit)
}

fn size(call: Call<'_>) -> anyhow::Result<Returned> {
    let path = call
        .get(0)
        .and_then(Value::as_path)
        .ok_or_else(|| anyhow!("no file given"))?;
    let metadata = fs::metadata(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(Value::UInt(metadata.len()).into())
}
