use diff_context::extend::extend_patch;
use diff_context::header::parse_hunk_header;
use diff_context::{
    EditType, ExtendConfig, FileDiff, extend_and_annotate_diff, extend_and_annotate_diff_with,
};
use proptest::prelude::*;

fn numbered(n: usize) -> String {
    (1..=n).map(|i| format!("L{i}\n")).collect()
}

fn narrow(before: usize, after: usize) -> ExtendConfig {
    ExtendConfig {
        lines_before: before,
        lines_after: after,
        ..ExtendConfig::default()
    }
}

#[test]
fn extended_and_numbered_end_to_end() {
    diff_context::telemetry::init_tracing("diff_context=debug");
    let patch = "@@ -10,2 +10,3 @@\n L10\n-L11\n+L11x\n+L11y";
    let out = extend_and_annotate_diff_with(
        &numbered(20),
        "",
        patch,
        "src/lib.c",
        EditType::Modified,
        &narrow(3, 3),
    );
    let expected = [
        "",
        "",
        "## File: 'src/lib.c'",
        "",
        "@@ -7,8 +7,9 @@",
        "__new hunk__",
        "7  L7",
        "8  L8",
        "9  L9",
        "10  L10",
        "11 +L11x",
        "12 +L11y",
        "13  L12",
        "14  L13",
        "15  L14",
        "__old hunk__",
        " L7",
        " L8",
        " L9",
        " L10",
        "-L11",
        " L12",
        " L13",
        " L14",
    ]
    .join("\n");
    assert_eq!(out, expected);
}

#[test]
fn deleted_file_ignores_patch_content() {
    let out = extend_and_annotate_diff("a\nb\n", "", "@@ garbage", "old.rs", EditType::Deleted);
    assert_eq!(out, "\n\nFile 'old.rs' was deleted\n");
}

#[test]
fn invalid_hunk_keeps_raw_header() {
    let patch = "@@ -10,2 +10,2 @@ int main()\n int x = 5;\n-L11\n+L11x";
    let out = extend_and_annotate_diff(
        &numbered(20),
        "",
        patch,
        "main.c",
        EditType::Modified,
    );
    assert!(out.contains("\n@@ -10,2 +10,2 @@ int main()\n__new hunk__\n10  int x = 5;\n11 +L11x\n"));
    assert!(!out.contains(" L9"));
}

#[test]
fn failed_expansion_still_renders_patch() {
    let patch = "@@ -99999999999999999999999,1 +3,1 @@\n-x\n+y";
    let out = extend_and_annotate_diff(&numbered(5), "", patch, "f", EditType::Modified);
    assert!(out.ends_with("__new hunk__\n3 +y\n__old hunk__\n-x"));
}

#[test]
fn huge_new_start_renders_without_panicking() {
    let patch = format!("@@ -1,1 +{},2 @@\n-a\n+b\n+c", usize::MAX);
    let out = extend_and_annotate_diff("a\n", "", &patch, "f", EditType::Modified);
    let max = usize::MAX;
    assert!(out.ends_with(&format!("__new hunk__\n{max} +b\n{max} +c\n__old hunk__\n-a")));
}

#[test]
fn file_diff_record_renders_from_json() {
    let json = r#"{
        "path": "src/a.rs",
        "edit_type": "Added",
        "original": "",
        "patch": "@@ -0,0 +1,2 @@\n+fn a() {}\n+fn b() {}"
    }"#;
    let diff: FileDiff = serde_json::from_str(json).unwrap();
    let out = diff.render(&ExtendConfig::default());
    assert!(out.ends_with("@@ -0,0 +1,2 @@\n__new hunk__\n1 +fn a() {}\n2 +fn b() {}"));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Case {
    original: Vec<String>,
    start: usize,
    size: usize,
    added: usize,
    cfg: ExtendConfig,
    with_new: bool,
}

impl Case {
    fn patch(&self) -> String {
        let mut out = format!(
            "@@ -{},{} +{},{} @@ fn f5()\n",
            self.start,
            self.size,
            self.start,
            1 + self.added
        );
        out.push_str(&format!(" {}\n", self.original[self.start - 1]));
        for k in 1..self.size {
            out.push_str(&format!("-{}\n", self.original[self.start - 1 + k]));
        }
        for k in 0..self.added {
            out.push_str(&format!("+added{k}\n"));
        }
        out
    }

    fn new_file(&self) -> String {
        if !self.with_new {
            return String::new();
        }
        let mut lines: Vec<String> = self.original[..self.start].to_vec();
        lines.extend((0..self.added).map(|k| format!("added{k}")));
        lines.extend_from_slice(&self.original[self.start - 1 + self.size..]);
        lines.join("\n")
    }
}

fn source_line(i: usize) -> String {
    if i % 5 == 0 {
        format!("fn f{i}() {{")
    } else {
        format!("line{i}")
    }
}

fn hunk_case() -> impl Strategy<Value = Case> {
    (1usize..40)
        .prop_flat_map(|n| (Just(n), 1..=n))
        .prop_flat_map(|(n, start)| {
            (
                Just(n),
                Just(start),
                1..=(n - start + 1),
                0usize..4,
                0usize..12,
                0usize..12,
                any::<bool>(),
                any::<bool>(),
            )
        })
        .prop_map(|(n, start, size, added, before, after, with_new, dynamic)| Case {
            original: (1..=n).map(source_line).collect(),
            start,
            size,
            added,
            cfg: ExtendConfig {
                lines_before: before,
                lines_after: after,
                lines_before_dynamic: 10,
                allow_dynamic_context: dynamic,
            },
            with_new,
        })
}

proptest! {
    #[test]
    fn extended_sizes_match_emitted_body(case in hunk_case()) {
        let original = case.original.join("\n");
        let out = extend_patch(&case.patch(), &original, &case.new_file(), &case.cfg).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        prop_assert_eq!(lines[0], "");

        let header = parse_hunk_header(lines[1]).unwrap().unwrap();
        let body = &lines[2..];
        let old_side = body.iter().filter(|l| !l.starts_with('+')).count();
        let new_side = body.iter().filter(|l| !l.starts_with('-')).count();

        prop_assert_eq!(header.size1, old_side);
        prop_assert_eq!(header.size2, new_side);
        prop_assert!(header.size1 >= case.size);
        prop_assert!(header.start1 >= 1);
        prop_assert!(header.start1 - 1 + header.size1 <= case.original.len());
        prop_assert_eq!(header.start1, header.start2);
    }

    #[test]
    fn new_hunk_numbers_are_consecutive(case in hunk_case()) {
        prop_assume!(case.size > 1 || case.added > 0);
        let original = case.original.join("\n");
        let new = case.new_file();
        let out = extend_and_annotate_diff_with(
            &original,
            &new,
            &case.patch(),
            "f.rs",
            EditType::Modified,
            &case.cfg,
        );

        let lines: Vec<&str> = out.lines().collect();
        let header_idx = lines.iter().position(|l| l.starts_with("@@")).unwrap();
        let header = parse_hunk_header(lines[header_idx]).unwrap().unwrap();
        prop_assert_eq!(lines[header_idx + 1], "__new hunk__");

        let numbers: Vec<usize> = lines[header_idx + 2..]
            .iter()
            .take_while(|l| **l != "__old hunk__")
            .map(|l| l.split(' ').next().unwrap().parse::<usize>().unwrap())
            .collect();
        prop_assert_eq!(numbers.len(), header.size2);
        for (offset, n) in numbers.iter().enumerate() {
            prop_assert_eq!(*n, header.start2 + offset);
        }
    }

    #[test]
    fn mismatching_hunk_is_byte_identical(
        n in 1usize..30,
        before in 0usize..10,
        after in 0usize..10,
    ) {
        let original = numbered(n);
        let patch = "@@ -1,2 +1,2 @@ section\n definitely not in the file\n-L2\n+L2x";
        let out = extend_patch(patch, &original, &original, &narrow(before, after)).unwrap();
        prop_assert_eq!(out, format!("\n{patch}"));
    }
}
