/// Numbered message templates. `{}` placeholders are filled in order.
pub static CATALOG: &[(u16, &str)] = &[(1, "nepa {}"),
                                       (2, "nepa: intérprete de programas .script\n\
                                            Autores: {}\n\
                                            Licencia: {}"),
                                       (3, "uso: nepa [opciones] <programa> [argumentos...]"),
                                       (4, "falta el programa a ejecutar"),
                                       (5, "error: {}"),
                                       (10, "ejecutando '{}'"),
                                       (11, "'{}' terminó con {} variables"),
                                       (12, "subprograma '{}' invocado desde la línea {}"),
                                       (13, "configuración cargada de '{}'"),
                                       (20, "se ignoran {} errores de sintaxis")];

/// Looks a template up by code.
#[must_use]
pub fn template(code: u16) -> Option<&'static str> {
    CATALOG.iter()
           .find(|(entry, _)| *entry == code)
           .map(|(_, text)| *text)
}

/// Fills the template `code` with `args`.
///
/// Extra placeholders stay empty and extra arguments are ignored. An
/// unknown code renders as `[mensaje N]`.
///
/// # Example
/// ```
/// use nepa::messages::message;
///
/// assert_eq!(message(10, &["a.script"]), "ejecutando 'a.script'");
/// assert_eq!(message(12, &["b.script", "4"]), "subprograma 'b.script' invocado desde la línea 4");
/// assert_eq!(message(999, &[]), "[mensaje 999]");
/// ```
#[must_use]
pub fn message(code: u16, args: &[&str]) -> String {
    let Some(template) = template(code) else {
        return format!("[mensaje {code}]");
    };
    let mut args = args.iter();
    let mut pieces = template.split("{}");
    let mut out = pieces.next().unwrap_or_default().to_string();
    for piece in pieces {
        out.push_str(args.next().copied().unwrap_or_default());
        out.push_str(piece);
    }
    out
}
