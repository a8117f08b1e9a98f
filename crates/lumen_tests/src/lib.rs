//! End-to-end scenarios cutting across `lumen_base`, `lumen_syntax`,
//! `lumen_parser`, `lumen_package` and `lumen_resolve`. See `tests/` for
//! the individual scenarios.
