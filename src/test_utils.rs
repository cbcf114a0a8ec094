use std::{io::BufRead, path::{Path, PathBuf}};

use anyhow::bail;
use itertools::Itertools;
use serde::{de::{Error, Visitor}, Deserialize};

use crate::error::ErrorKind;


/// Expected outcome of one fixture line: the printed form of the value
/// (`None` when any value will do), or the kind of error raised.
#[derive(Debug, Clone)]
pub struct EvaluationResult(Result<Option<String>, ErrorKind>);

impl From<EvaluationResult> for Result<Option<String>, ErrorKind> {
    fn from(value: EvaluationResult) -> Self {
        value.0
    }
}

struct EvaluationResultVisitor {}

impl<'de> Deserialize<'de> for EvaluationResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de> {

        deserializer.deserialize_map(EvaluationResultVisitor {})
    }
}

impl<'de> Visitor<'de> for EvaluationResultVisitor {
    type Value = EvaluationResult;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "A structure containing the boolean key 'ok'. If it's okay, contains the key 'output', otherwise the key 'type'")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>, {

        if map.next_key::<String>()? != Some("ok".to_owned()) {
            return Err(A::Error::custom("First key should be 'ok'"))
        }

        let ok: bool = map.next_value()?;
        let result = if ok {
            if map.next_key::<String>()?.as_ref()
                .ok_or(A::Error::custom("Must have two keys"))? != "output"
            {
                return Err(A::Error::custom("Second ok key should be 'output'"))
            }

            let value: Option<String> = map.next_value()?;
            EvaluationResult(Ok(value))
        } else {
            if map.next_key::<String>()?.as_ref()
                .ok_or(A::Error::custom("Must have two keys"))? != "type"
            {
                return Err(A::Error::custom("Second key should be 'type'"))
            }

            let name = map.next_value::<String>()?;
            match ErrorKind::from_name(&name) {
                Some(kind) => EvaluationResult(Err(kind)),
                None => return Err(A::Error::custom(format!("Unrecognized error kind: {}", name))),
            }
        };

        if map.next_key::<String>()?.is_some() {
            return Err(A::Error::custom("Only two keys should be present"));
        }

        Ok(result)
    }
}

fn load_input_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<String>> {
    let source = std::fs::read(path)?;
    Ok(source.lines().collect::<Result<Vec<String>, _>>()?)
}

fn load_output_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<EvaluationResult>> {
    let source = std::fs::read(path)?;
    let result: Vec<EvaluationResult> = serde_json::from_slice(&source)?;
    Ok(result)
}

const TESTCASES: usize = 6;

pub fn load_test_pair(testcase: usize) -> anyhow::Result<Vec<(String, EvaluationResult)>> {
    if testcase < 1 || testcase > TESTCASES { bail!("Testcase out of bounds"); }

    let base_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let input = load_input_file(base_path.join("test_inputs").join(format!("{}.lisp", testcase)))?;
    let output = load_output_file(base_path.join("test_outputs").join(format!("{}.json", testcase)))?;

    if input.len() != output.len() { bail!("Input and output of testcase {} do not match", testcase); }
    Ok(input.into_iter().zip(output).collect_vec())
}

pub fn all_testcases() -> impl Iterator<Item = usize> {
    1..=TESTCASES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_result_shapes() -> anyhow::Result<()> {
        let results: Vec<EvaluationResult> = serde_json::from_str(
            r#"[{"ok": true, "output": "3"}, {"ok": true, "output": null}, {"ok": false, "type": "Args"}]"#)?;
        let results: Vec<Result<Option<String>, ErrorKind>> = results.into_iter().map(Into::into).collect_vec();
        assert_eq!(results, vec![Ok(Some("3".to_owned())), Ok(None), Err(ErrorKind::Args)]);
        Ok(())
    }

    #[test]
    fn rejects_unknown_kinds() {
        let result = serde_json::from_str::<Vec<EvaluationResult>>(r#"[{"ok": false, "type": "Weird"}]"#);
        assert!(result.is_err());
    }
}
