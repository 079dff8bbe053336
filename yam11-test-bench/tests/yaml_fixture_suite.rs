extern crate libtest_mimic;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use libtest_mimic::{Arguments, Failed, Trial};
use yam11_core::emitter::EmitterOptions;
use yam11_core::Parser;
use yam11_test_bench::{assert_round_trip, write_str_from_event};

const TEST_SIZE: usize = 32;

#[derive(Default)]
struct TestData {
    desc: String,
    input_yaml: PathBuf,
    is_error: bool,
    test_event: PathBuf,
}

fn perform_test(data: TestData) -> Result<(), Failed> {
    let input_yaml = fs::read_to_string(&data.input_yaml)?;
    let expected_event = fs::read_to_string(&data.test_event)?;

    let mut actual_event = String::with_capacity(input_yaml.len());
    let mut parser = Parser::new_from_str(&input_yaml);
    write_str_from_event(&mut actual_event, &mut parser, true);
    let is_error = actual_event.ends_with("ERR\n");

    if is_error != data.is_error {
        return Err(format!(
            "expected error: {}, got events:\n{actual_event}",
            data.is_error
        )
        .into());
    }
    if data.is_error {
        if !actual_event.starts_with(&expected_event) {
            return Err(format!(
                "events before the error differ\nexpected:\n{expected_event}\nactual:\n{actual_event}"
            )
            .into());
        }
        return Ok(());
    }
    if actual_event != expected_event {
        return Err(format!("expected:\n{expected_event}\nactual:\n{actual_event}").into());
    }

    std::panic::catch_unwind(|| {
        assert_round_trip(&input_yaml, EmitterOptions::default());
    })
    .map_err(|_| Failed::from("emitter round trip failed"))
}

fn collect_test(dir_name: String, test_dir_path: &Path) -> Result<Trial, Box<dyn Error>> {
    let mut test_data = TestData::default();
    for entry in fs::read_dir(test_dir_path)? {
        let entry = entry?;
        let filename = entry
            .file_name()
            .into_string()
            .map_err(|name| format!("non-UTF8 file name {name:?}"))?;
        match &*filename {
            "===" => test_data.desc = String::from(fs::read_to_string(entry.path())?.trim()),
            "in.yaml" => test_data.input_yaml = entry.path(),
            "error" => test_data.is_error = true,
            "test.event" => test_data.test_event = entry.path(),
            _ => {}
        }
    }
    let name = format!("{} ({})", dir_name, test_data.desc);
    Ok(Trial::test(name, move || perform_test(test_data)))
}

fn collect_tests(path: &Path) -> Result<Vec<Trial>, Box<dyn Error>> {
    let mut tests = Vec::with_capacity(TEST_SIZE);
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let dir_name = entry
            .file_name()
            .into_string()
            .map_err(|name| format!("non-UTF8 directory name {name:?}"))?;
        tests.push(collect_test(dir_name, &entry.path())?);
    }
    tests.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(tests)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Arguments::from_args();

    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");

    let tests = collect_tests(&path)?;
    libtest_mimic::run(&args, tests).exit();
}
