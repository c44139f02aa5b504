// Thu Oct 15 2026 - Alex

use crate::binary::BinaryInfo;
use crate::catalog::Invocable;
use crate::output::Bundle;
use std::borrow::Cow;

pub const CSV_HEADER: [&str; 15] = [
    "Function",
    "Ordinal",
    "Hint",
    "RVA",
    "ForwardedTo",
    "ReturnType",
    "Parameters",
    "Signature",
    "DocComment",
    "HeaderFile",
    "Line",
    "Demangled",
    "DocFiles",
    "IsSigned",
    "Publisher",
];

/// RFC 4180 quoting: fields holding a comma, quote or line break are wrapped
/// in quotes with inner quotes doubled.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

pub fn render_csv(bundle: &Bundle) -> String {
    let mut csv = String::new();
    csv.push_str(&CSV_HEADER.join(","));
    csv.push('\n');

    for invocable in &bundle.invocables {
        let fields = row(invocable, &bundle.binary);
        let line: Vec<Cow<'_, str>> = fields.iter().map(|f| escape_field(f)).collect();
        csv.push_str(&line.join(","));
        csv.push('\n');
    }

    csv
}

fn row(inv: &Invocable, binary: &BinaryInfo) -> [String; 15] {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        inv.name.clone(),
        inv.ordinal.map(|o| o.to_string()).unwrap_or_default(),
        opt(&inv.hint),
        opt(&inv.rva),
        opt(&inv.evidence.forwarded_to),
        opt(&inv.signature.return_type),
        opt(&inv.signature.parameters),
        opt(&inv.signature.full_prototype),
        opt(&inv.documentation.description),
        opt(&inv.documentation.source_file),
        inv.documentation.source_line.map(|l| l.to_string()).unwrap_or_default(),
        opt(&inv.evidence.demangled_name),
        inv.documentation.references.join(";"),
        binary.is_signed.to_string(),
        opt(&binary.publisher),
    ]
}
