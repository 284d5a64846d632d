use colored::*;
use quietmove::{perft::perft, position::Position};
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::PathBuf, time::Instant};
use thiserror::Error;

const EXIT_FAILURE: i32 = 1;
const CARGO_MANIFEST_DIR_ENV_VARIABLE: &str = "CARGO_MANIFEST_DIR";

//======================================================================================================================
// Error handling
//======================================================================================================================

/// Errors that are related to the test harness.
#[derive(Error, Debug)]
enum TestHarnessError {
    #[error("The {} environment variable cannot be read", CARGO_MANIFEST_DIR_ENV_VARIABLE)]
    ManifestDirNotFound,

    #[error("Resource path not found: {0:?}")]
    ResourcePathNotFound(PathBuf),

    #[error("Cannot read the test data file ({0:?})")]
    CannotReadTestDataFile(PathBuf),

    #[error("Cannot parse the test data file: {0}")]
    CannotParseTestDataFile(#[from] serde_json::Error),
}

/// Errors used when tests fail.
#[derive(Error, Debug)]
enum TestFailureError {
    #[error("Unable to parse the fen string : \"{0}\"")]
    UnableToParseFen(String),

    #[error("Wrong node count at depth {depth}\n\nExpected: {expected}\n\nActual: {actual}")]
    WrongNodeCount { depth: u16, expected: u64, actual: u64 },

    #[error("The position changed after perft({depth})\n\nOriginal: {original}\n\nActual: {actual}")]
    PositionChanged { depth: u16, original: String, actual: String },

    #[error("The incremental hash does not match a recomputed hash after perft({depth})")]
    HashMismatch { depth: u16 },
}

/// Global errors for this harness.
#[derive(Error, Debug)]
enum PerftSuiteError {
    #[error("Test harness error: {}", .0)]
    TestHarnessError(#[from] TestHarnessError),

    #[error("---- {} ----\n{}", .test_name, .test_failure_error)]
    TestFailed { test_name: String, test_failure_error: TestFailureError },
}

//======================================================================================================================
// Test data structures
//======================================================================================================================

/// A perft test case: a position and the expected leaf counts at several depths.
#[derive(Debug, Deserialize)]
struct Test {
    description: String,
    fen: String,
    counts: Vec<TestCount>,
}

#[derive(Debug, Deserialize)]
struct TestCount {
    depth: u16,
    nodes: u64,
}

fn read_tests_data() -> Result<Vec<Test>, PerftSuiteError> {
    let tests_file_path = get_resource_path("tests/data/perft.json")?;
    let file = File::open(&tests_file_path).map_err(|_| TestHarnessError::CannotReadTestDataFile(tests_file_path))?;
    let reader = BufReader::new(file);
    let tests: Vec<Test> = serde_json::from_reader(reader).map_err(TestHarnessError::CannotParseTestDataFile)?;
    Ok(tests)
}

//======================================================================================================================
// Test harness
//======================================================================================================================

fn check_counts(test: &Test) -> Result<(), TestFailureError> {
    let mut position =
        Position::new_from_fen(&test.fen).map_err(|_| TestFailureError::UnableToParseFen(test.fen.clone()))?;

    for count in test.counts.iter() {
        let actual = perft(&mut position, count.depth);
        if actual != count.nodes {
            return Err(TestFailureError::WrongNodeCount { depth: count.depth, expected: count.nodes, actual });
        }

        let fen = position.to_fen();
        if fen != test.fen {
            return Err(TestFailureError::PositionChanged {
                depth: count.depth,
                original: test.fen.clone(),
                actual: fen,
            });
        }

        if position.hash() != position.compute_hash() {
            return Err(TestFailureError::HashMismatch { depth: count.depth });
        }
    }

    Ok(())
}

/// Run a single test case.
fn run_test(test: &Test) -> Result<(), PerftSuiteError> {
    check_counts(test).map_err(|test_failure_error| PerftSuiteError::TestFailed {
        test_name: test.description.clone(),
        test_failure_error,
    })
}

/// Run all the tests. Returns the number of failed tests.
fn run_tests() -> Result<usize, PerftSuiteError> {
    let tests = read_tests_data()?;

    println!("\nrunning {} tests", tests.len());

    let start = Instant::now();
    let mut passed = 0;
    let mut failures: Vec<PerftSuiteError> = Vec::new();
    for test in tests.iter() {
        print!("test perft {} ...", test.description);
        let result_string = match run_test(test) {
            Ok(_) => {
                passed += 1;
                "ok".green()
            }
            Err(error) => {
                failures.push(error);
                "FAILED".red()
            }
        };
        println!(" {}", result_string);
    }
    let seconds = start.elapsed().as_secs_f32();

    for failure in failures.iter() {
        println!("\n{}", failure)
    }

    println!(
        "\ntest result: {}. {} passed; {} failed; finished in {:.2}s\n",
        if failures.is_empty() { "ok".green() } else { "FAILED".red() },
        passed,
        failures.len(),
        seconds
    );

    Ok(failures.len())
}

//======================================================================================================================
// Main function and helpers
//======================================================================================================================

fn get_resource_path(relative_path: &str) -> Result<PathBuf, TestHarnessError> {
    let mut path = std::env::var(CARGO_MANIFEST_DIR_ENV_VARIABLE)
        .map(PathBuf::from)
        .map_err(|_| TestHarnessError::ManifestDirNotFound)?;
    path.push(relative_path);

    if !path.exists() {
        return Err(TestHarnessError::ResourcePathNotFound(path));
    }

    Ok(path)
}

fn main() {
    match run_tests() {
        Ok(0) => {}
        Ok(_) => std::process::exit(EXIT_FAILURE),
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(EXIT_FAILURE)
        }
    }
}
