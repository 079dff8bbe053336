pub const BLOCK_MAP_INPUT: &str = "a: 1\nb: 2\n";
pub const BLOCK_MAP_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
=VAL :1
=VAL :b
=VAL :2
-MAP
-DOC";

pub const BLOCK1_INPUT: &str = r"
    - a
    - b
";
pub const BLOCK2_INPUT: &str = "- a\n- b\n";
pub const BLOCK_EVENTS: &str = r"
+DOC
+SEQ
=VAL :a
=VAL :b
-SEQ
-DOC";

pub const SEQ_PLAIN_INPUT: &str = r"
- x - y
";
pub const SEQ_PLAIN_EVENTS: &str = r"
+DOC
+SEQ
=VAL :x - y
-SEQ
-DOC";

pub const NESTED_SEQ_INPUT: &str = r"
- - a
  - b
- c
";
pub const NESTED_SEQ_EVENTS: &str = r"
+DOC
+SEQ
+SEQ
=VAL :a
=VAL :b
-SEQ
=VAL :c
-SEQ
-DOC";

pub const INDENTLESS_INPUT: &str = r"
key:
- a
- b
other: c
";
pub const INDENTLESS_EVENTS: &str = r"
+DOC
+MAP
=VAL :key
+SEQ
=VAL :a
=VAL :b
-SEQ
=VAL :other
=VAL :c
-MAP
-DOC";

pub const NESTED_MAP_INPUT: &str = r"
outer:
  inner: 1
  list:
    - x
last:
";
pub const NESTED_MAP_EVENTS: &str = r"
+DOC
+MAP
=VAL :outer
+MAP
=VAL :inner
=VAL :1
=VAL :list
+SEQ
=VAL :x
-SEQ
-MAP
=VAL :last
=VAL :
-MAP
-DOC";

pub const COMPLEX_KEY_INPUT: &str = r"
? a
: b
? - c
";
pub const COMPLEX_KEY_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
=VAL :b
+SEQ
=VAL :c
-SEQ
=VAL :
-MAP
-DOC";

pub const MULTILINE_PLAIN_INPUT: &str = r"
key: first
  second

  third
";
pub const MULTILINE_PLAIN_EVENTS: &str = r"
+DOC
+MAP
=VAL :key
=VAL :first second\nthird
-MAP
-DOC";

pub const LITERAL_INPUT: &str = "text: |\n  line1\n  line2\n";
pub const LITERAL_EVENTS: &str = r"
+DOC
+MAP
=VAL :text
=VAL |line1\nline2\n
-MAP
-DOC";

pub const FOLDED_INPUT: &str = r"
- >
  a
  b

  c
";
pub const FOLDED_EVENTS: &str = r"
+DOC
+SEQ
=VAL >a b\nc\n
-SEQ
-DOC";

pub const CHOMP_INPUT: &str = "- |-\n  x\n- |+\n  y\n\n";
pub const CHOMP_EVENTS: &str = r"
+DOC
+SEQ
=VAL |x
=VAL |y\n\n
-SEQ
-DOC";

pub const INDENT_INDICATOR_INPUT: &str = "- |2\n   lead\n  x\n";
pub const INDENT_INDICATOR_EVENTS: &str = r"
+DOC
+SEQ
=VAL | lead\nx\n
-SEQ
-DOC";

pub const ANCHOR_ALIAS_INPUT: &str = r"
- &x a
- *x
- &seq [b]
- *seq
";
pub const ANCHOR_ALIAS_EVENTS: &str = r"
+DOC
+SEQ
=VAL &x :a
=ALI *x
+SEQ [] &seq
=VAL :b
-SEQ
=ALI *seq
-SEQ
-DOC";

pub const TAGS_INPUT: &str = r"
- !!int 3
- !local x
- !<tag:yaml.org,2002:str> y
- &a !!str z
- !!str &b w
";
pub const TAGS_EVENTS: &str = r"
+DOC
+SEQ
=VAL <tag:yaml.org,2002:int> :3
=VAL <!local> :x
=VAL <tag:yaml.org,2002:str> :y
=VAL &a <tag:yaml.org,2002:str> :z
=VAL &b <tag:yaml.org,2002:str> :w
-SEQ
-DOC";

pub const EXPLICIT_DOC_INPUT: &str = "--- a\n...\n";
pub const EXPLICIT_DOC_EVENTS: &str = r"
+DOC ---
=VAL :a
-DOC ...";

pub const MULTI_DOC_INPUT: &str = "a\n--- b\n---\n- c\n";
pub const MULTI_DOC_EVENTS: &str = r"
+DOC
=VAL :a
-DOC
+DOC ---
=VAL :b
-DOC
+DOC ---
+SEQ
=VAL :c
-SEQ
-DOC";

pub const DIRECTIVE_INPUT: &str = "%YAML 1.1\n%TAG !e! tag:example.com,2000:app/\n--- !e!foo x\n";
pub const DIRECTIVE_EVENTS: &str = r"
+DOC ---
=VAL <tag:example.com,2000:app/foo> :x
-DOC";

pub const FLOW_MAP_INPUT: &str = "{a: 1, b: 2}";
pub const FLOW_MAP_EVENTS: &str = r"
+DOC
+MAP {}
=VAL :a
=VAL :1
=VAL :b
=VAL :2
-MAP
-DOC";

pub const FLOW_NESTED_INPUT: &str = "[a, [b, c], {d: e}, []]";
pub const FLOW_NESTED_EVENTS: &str = r"
+DOC
+SEQ []
=VAL :a
+SEQ []
=VAL :b
=VAL :c
-SEQ
+MAP {}
=VAL :d
=VAL :e
-MAP
+SEQ []
-SEQ
-SEQ
-DOC";

pub const FLOW_PAIR_INPUT: &str = "[a: b, c]";
pub const FLOW_PAIR_EVENTS: &str = r"
+DOC
+SEQ []
+MAP {}
=VAL :a
=VAL :b
-MAP
=VAL :c
-SEQ
-DOC";

pub const FLOW_EMPTY_VALUES_INPUT: &str = "{a, b: }";
pub const FLOW_EMPTY_VALUES_EVENTS: &str = r"
+DOC
+MAP {}
=VAL :a
=VAL :
=VAL :b
=VAL :
-MAP
-DOC";

pub const FLOW_MULTILINE_INPUT: &str = r"
key: [a,
  b, c d
  e]
";
pub const FLOW_MULTILINE_EVENTS: &str = r"
+DOC
+MAP
=VAL :key
+SEQ []
=VAL :a
=VAL :b
=VAL :c d e
-SEQ
-MAP
-DOC";

pub const FLOW_IN_BLOCK_INPUT: &str = "a: [b, {c: d}]\n";
pub const FLOW_IN_BLOCK_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
+SEQ []
=VAL :b
+MAP {}
=VAL :c
=VAL :d
-MAP
-SEQ
-MAP
-DOC";

pub const SINGLE_QUOTE_INPUT: &str = "- 'it''s'\n- 'a\n  b'\n- 'c\n\n  d'\n";
pub const SINGLE_QUOTE_EVENTS: &str = r"
+DOC
+SEQ
=VAL 'it's
=VAL 'a b
=VAL 'c\nd
-SEQ
-DOC";

pub const DOUBLE_QUOTE_INPUT: &str = "- \"a\\tb\"\n- \"\\u263A x\"\n- \"a\\\n  b\"\n- \"\\x41\\\\\"\n";
pub const DOUBLE_QUOTE_EVENTS: &str = r#"
+DOC
+SEQ
=VAL "a\tb
=VAL "☺ x
=VAL "ab
=VAL "A\\
-SEQ
-DOC"#;

pub const QUOTED_KEYS_INPUT: &str = "'k': \"v\"\n\"x y\": 'z'\n";
pub const QUOTED_KEYS_EVENTS: &str = r#"
+DOC
+MAP
=VAL 'k
=VAL "v
=VAL "x y
=VAL 'z
-MAP
-DOC"#;

pub const VALUE_AFTER_VALUE_INPUT: &str = "a: : b";
pub const VALUE_AFTER_VALUE_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
ERR";

pub const TAB_INDENT_INPUT: &str = "a:\n\tb: c\n";
pub const TAB_INDENT_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
ERR";

pub const CONTENT_AFTER_END_INPUT: &str = "a\n...\nb";
pub const CONTENT_AFTER_END_EVENTS: &str = r"
+DOC
=VAL :a
-DOC ...
ERR";

pub const UNCLOSED_FLOW_INPUT: &str = "[a, b";
pub const UNCLOSED_FLOW_EVENTS: &str = r"
+DOC
+SEQ []
=VAL :a
=VAL :b
ERR";

pub const MISSING_VALUE_INDICATOR_INPUT: &str = "a: 1\nb\n";
pub const MISSING_VALUE_INDICATOR_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
=VAL :1
ERR";

pub const BAD_ESCAPE_INPUT: &str = "\"\\q\"";
pub const UNCLOSED_QUOTE_INPUT: &str = "'abc";
pub const NON_PRINTABLE_INPUT: &str = "a: \u{7}";
pub const BAD_INDICATOR_INPUT: &str = "key: @x";
pub const ERR_EVENTS: &str = r"
ERR";
