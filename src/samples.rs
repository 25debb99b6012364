//! Bundled demo scripts
//!
//! Small scripts that exercise every statement form the engine supports.
//! The UI binds them to number keys so a run can start without loading a
//! file; tests run them end to end and assert on the final environment.

/// A named script shipped with the binary.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub name: &'static str,
    pub source: &'static str,
}

/// Sums an array and takes the average. The canonical walkthrough: one
/// declaration per value shape, a counting loop over the array, and a
/// trailing computed declaration.
pub const ARRAY_SUM: Sample = Sample {
    name: "array-sum",
    source: r#"// Sum the numbers in an array
let arr = [5, 2, 8, 1, 9]
let sum = 0

for (let i = 0; i < arr.length; i++) {
  sum = sum + arr[i]
}

let average = sum / arr.length
"#,
};

/// Walks the Fibonacci sequence with a rolling pair. After the run `a`
/// holds the ninth Fibonacci number, 34.
pub const FIBONACCI: Sample = Sample {
    name: "fibonacci",
    source: r#"// Walk the Fibonacci sequence
let n = 8
let a = 0
let b = 1

for (let i = 0; i <= n; i++) {
  let temp = a + b
  a = b
  b = temp
}
"#,
};

/// Factorial by repeated multiplication: 5! = 120.
pub const FACTORIAL: Sample = Sample {
    name: "factorial",
    source: r#"// Factorial by repeated multiplication
let n = 5
let factorial = 1

for (let i = 1; i <= n; i++) {
  factorial = factorial * i
}
"#,
};

/// Finds the largest element with a conditional inside the loop body.
pub const FIND_MAX: Sample = Sample {
    name: "find-max",
    source: r#"// Find the largest element
let numbers = [3, 7, 2, 9, 1, 5]
let max = numbers[0]

for (let i = 1; i < numbers.length; i++) {
  let current = numbers[i]
  if (current > max) {
    max = current
  }
}
"#,
};

/// Every bundled sample, in the order the UI lists them.
pub const ALL: [Sample; 4] = [ARRAY_SUM, FIBONACCI, FACTORIAL, FIND_MAX];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Script;

    #[test]
    fn test_every_sample_parses() {
        for sample in ALL {
            assert!(
                Script::parse(sample.source).is_ok(),
                "sample {} should parse",
                sample.name
            );
        }
    }

    #[test]
    fn test_sample_names_are_unique() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
