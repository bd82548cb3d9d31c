//! Prompt templates for the search strategies.
//!
//! The instructions are written in Polish; the answer language is taken from
//! `lang`.

use crate::iteration::{ResearchIteration, Source, numbered_sources};

/// Fallback suffix for the second research query.
pub const SECOND_QUERY_SUFFIX: &str = "szczegóły";

/// Fallback suffix for the third research query.
pub const THIRD_QUERY_SUFFIX: &str = "kontekst i źródła";

/// One-pass answer with inline citations and a sources section.
pub fn answer_prompt(query: &str, lang: &str) -> String {
    format!(
        "Sprawdź w sieci: {query}\n\n\
         Wymagania:\n\
         - Odpowiedz po {lang} (jeśli użytkownik nie prosi inaczej).\n\
         - Streść w 6–12 punktach.\n\
         - Dodaj cytowania w tekście w formacie [1], [2]...\n\
         - Na końcu dodaj sekcję 'Źródła:' jako listę numerowaną: [n] tytuł — URL.\n\
         - Jeśli informacje są rozbieżne, pokaż 2–3 warianty i oznacz cytowaniami.\n\
         - Preferuj źródła pierwotne/oficjalne (docs, release notes, GitHub releases) nad blogami i agregatorami.\n"
    )
}

/// One research pass returning strict JSON.
pub fn plan_prompt(query: &str, lang: &str) -> String {
    format!(
        "Sprawdź w sieci: {query}\n\n\
         Zwróć WYŁĄCZNIE poprawny JSON (bez markdown), w schemacie:\n\
         {{\n  \
           \"tldr_bullets\": [\"...\"],\n  \
           \"sources\": [{{\"title\":\"...\",\"url\":\"...\"}}],\n  \
           \"followup_queries\": [\"...\",\"...\"]\n\
         }}\n\
         Zasady:\n\
         - język: {lang}\n\
         - 5–10 bulletów\n\
         - sources: 3–8 pozycji, preferuj źródła pierwotne/oficjalne\n\
         - followup_queries: max 2, bardziej szczegółowe niż startowe\n"
    )
}

/// Final synthesis over three research passes and their merged sources.
pub fn synthesis_prompt(
    query: &str,
    lang: &str,
    iterations: [&ResearchIteration; 3],
    sources: &[Source],
) -> String {
    let [first, second, third] = iterations;
    format!(
        "Zsyntetyzuj odpowiedź na pytanie użytkownika: {query}\n\n\
         Masz wyniki trzech iteracji researchu (poniżej). Zrób finalny skrót:\n\
         - język: {lang}\n\
         - 6–12 punktów\n\
         - cytowania w tekście w formacie [n] odnoszące się do listy 'Źródła' poniżej\n\
         - jeśli są rozbieżności, pokaż 2–3 warianty i oznacz cytowaniami\n\n\
         Iteracja 1 (JSON): {}\n\n\
         Iteracja 2 (JSON): {}\n\n\
         Iteracja 3 (JSON): {}\n\n\
         Źródła:\n{}\n",
        first.payload_json(),
        second.payload_json(),
        third.payload_json(),
        numbered_sources(sources),
    )
}
