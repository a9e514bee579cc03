//! Starter source templates

use crate::language::LanguageId;
use crate::problem::{ProblemSummary, problem_url};

const PYTHON: &str = r#"import sys
input = sys.stdin.readline

def main():
    pass

if __name__ == "__main__":
    main()
"#;

const JAVASCRIPT: &str = r#""use strict";

const fs = require("fs");
const input = fs.readFileSync(0, "utf8").trimEnd().split(/\s+/);

function main() {
}

main();
"#;

const KOTLIN: &str = r#"import java.io.BufferedReader
import java.io.InputStreamReader
import java.util.StringTokenizer

private class FastScanner {
    private val br = BufferedReader(InputStreamReader(System.`in`))
    private var st: StringTokenizer? = null

    fun next(): String {
        while (st == null || !st!!.hasMoreTokens()) {
            val line = br.readLine() ?: return ""
            st = StringTokenizer(line)
        }
        return st!!.nextToken()
    }
}

fun main() {
}
"#;

const JAVA: &str = r#"import java.io.*;
import java.util.*;

public class Main {

  public static void main(String[] args) throws Exception {
  }

}
"#;

const CPP: &str = r#"#include <bits/stdc++.h>
using namespace std;

int main() {
  ios::sync_with_stdio(false);
  cin.tie(nullptr);

  return 0;
}
"#;

const C: &str = r#"#include <stdio.h>

int main(void) {
  return 0;
}
"#;

/// Render a starter source file for `language`.
///
/// With `problem` set, the header comment names the problem and links to it;
/// otherwise a generic header is used so the problem stays hidden.
pub fn template(language: LanguageId, problem: Option<&ProblemSummary>) -> String {
    let prefix = language.spec().comment_prefix();
    let header = match problem {
        Some(p) => format!(
            "{prefix} BOJ {id} - {title}\n{prefix} {url}\n",
            id = p.id,
            title = p.title,
            url = problem_url(p.id),
        ),
        None => format!("{prefix} BOJ Mock Test\n"),
    };

    let body = match language {
        LanguageId::Python => PYTHON,
        LanguageId::JavaScript => JAVASCRIPT,
        LanguageId::Kotlin => KOTLIN,
        LanguageId::Java => JAVA,
        LanguageId::Cpp => CPP,
        LanguageId::C => C,
    };

    format!("{header}\n{body}")
}
