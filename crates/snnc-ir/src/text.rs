//! Canonical text printer and parser for `SnnGraph`

use crate::{AttributeValue, Attrs, IrError, NeuronId, Result, SnnGraph, Synapse};

impl SnnGraph {
    /// Print the canonical textual form
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("snn.graph @t{} stages [", self.timestep));
        let stages: Vec<String> = self.completed_stages().iter().map(|s| s.to_string()).collect();
        out.push_str(&stages.join(", "));
        out.push(']');
        print_attrs(&mut out, &self.attrs);
        out.push('\n');

        for (id, attrs) in self.neurons() {
            out.push_str("  neuron ");
            out.push_str(&id.to_string());
            print_attrs(&mut out, attrs);
            out.push('\n');
        }
        for syn in self.synapses() {
            out.push_str(&format!("  synapse {} -> {}", syn.pre, syn.post));
            print_attrs(&mut out, &syn.attrs);
            out.push('\n');
        }
        out
    }
}

fn print_attrs(out: &mut String, attrs: &Attrs) {
    if attrs.is_empty() {
        out.push_str(" {}");
        return;
    }
    out.push_str(" { ");
    let mut first = true;
    for (k, v) in attrs {
        if !first {
            out.push_str(", ");
        }
        first = false;
        out.push_str(k);
        out.push_str(" = ");
        out.push_str(&v.to_string());
    }
    out.push_str(" }");
}

/// Parse the textual form produced by [`SnnGraph::to_text`].
///
/// Synapses are inserted unchecked so that malformed graphs (duplicate edges,
/// dangling endpoints) survive parsing and can be rejected by verification.
pub fn parse_text(input: &str) -> Result<SnnGraph> {
    let mut graph: Option<SnnGraph> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let err = |reason: String| IrError::Parse { line: line_no, reason };
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        let (head, attrs_str) = split_attr_block(line).map_err(err)?;
        let attrs = parse_attrs(attrs_str).map_err(err)?;

        if let Some(rest) = head.strip_prefix("snn.graph") {
            if graph.is_some() {
                return Err(err("second graph header".into()));
            }
            let mut g = parse_header(rest.trim()).map_err(err)?;
            g.attrs = attrs;
            graph = Some(g);
            continue;
        }

        let g = graph.as_mut().ok_or_else(|| err("item before graph header".into()))?;
        if let Some(name) = head.strip_prefix("neuron ") {
            let id: NeuronId = name.trim().parse().map_err(|e: IrError| err(e.to_string()))?;
            g.add_neuron(id, attrs).map_err(|e| err(e.to_string()))?;
        } else if let Some(rest) = head.strip_prefix("synapse ") {
            let (pre, post) = rest
                .split_once("->")
                .ok_or_else(|| err(format!("missing '->' in '{}'", rest)))?;
            let pre: NeuronId = pre.trim().parse().map_err(|e: IrError| err(e.to_string()))?;
            let post: NeuronId = post.trim().parse().map_err(|e: IrError| err(e.to_string()))?;
            g.push_edge(Synapse { pre, post, attrs });
        } else {
            return Err(err(format!("unrecognized item '{}'", head)));
        }
    }

    graph.ok_or(IrError::Parse { line: 0, reason: "missing 'snn.graph' header".into() })
}

fn parse_header(rest: &str) -> std::result::Result<SnnGraph, String> {
    // "@t<ts> stages [a, b]"
    let rest = rest.strip_prefix("@t").ok_or_else(|| format!("missing '@t' in '{}'", rest))?;
    let (ts, stages) = rest
        .split_once(" stages ")
        .ok_or_else(|| format!("missing 'stages' in '{}'", rest))?;
    let timestep: u64 = ts.trim().parse().map_err(|_| format!("bad timestep '{}'", ts))?;

    let inner = stages
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("bad stage list '{}'", stages))?;
    let stages = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u8>().map_err(|_| format!("bad stage '{}'", s)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut g = SnnGraph::new();
    g.timestep = timestep;
    g.set_completed_stages(stages);
    Ok(g)
}

// Splits "head { attrs }" into ("head", "attrs"). Names never contain braces,
// so the first '{' opens the block.
fn split_attr_block(line: &str) -> std::result::Result<(&str, &str), String> {
    let open = line.find('{').ok_or_else(|| "missing '{'".to_string())?;
    let close = line.rfind('}').ok_or_else(|| "missing '}'".to_string())?;
    if close < open {
        return Err("unbalanced braces".into());
    }
    if !line[close + 1..].trim().is_empty() {
        return Err(format!("trailing input '{}'", &line[close + 1..]));
    }
    Ok((line[..open].trim(), line[open + 1..close].trim()))
}

fn parse_attrs(s: &str) -> std::result::Result<Attrs, String> {
    let mut attrs = Attrs::new();
    for part in split_top_level(s) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (key, val) = part.split_once('=').ok_or_else(|| format!("missing '=' in attr '{}'", part))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty key in '{}'", part));
        }
        attrs.insert(key.to_string(), parse_value(val.trim())?);
    }
    Ok(attrs)
}

// Commas inside quoted text do not separate attributes.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_str = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if in_str {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_str = false,
                _ => {}
            }
        } else if c == '"' {
            in_str = true;
        } else if c == ',' {
            parts.push(&s[start..i]);
            start = i + 1;
        }
    }
    parts.push(&s[start..]);
    parts
}

fn parse_value(s: &str) -> std::result::Result<AttributeValue, String> {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        return unescape(&s[1..s.len() - 1]).map(AttributeValue::Text);
    }
    match s {
        "true" => return Ok(AttributeValue::Bool(true)),
        "false" => return Ok(AttributeValue::Bool(false)),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Ok(AttributeValue::Int(i));
    }
    if let Ok(f) = s.parse::<f64>() {
        return Ok(AttributeValue::Float(f));
    }
    Err(format!("unrecognized attribute value '{}'", s))
}

fn unescape(s: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(c @ ('\\' | '"' | '\'')) => out.push(c),
            Some('u') => {
                let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                let hex = hex.trim_start_matches('{');
                let code = u32::from_str_radix(hex, 16).map_err(|_| format!("bad escape '\\u{{{}}}'", hex))?;
                out.push(char::from_u32(code).ok_or_else(|| format!("bad code point {:x}", code))?);
            }
            other => return Err(format!("bad escape '\\{}'", other.map(String::from).unwrap_or_default())),
        }
    }
    Ok(out)
}
