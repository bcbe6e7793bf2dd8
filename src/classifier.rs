// src/classifier.rs
// Keyword gate that decides whether a chat prompt is a legal question.
// Matching is plain substring containment over the lowercased input, so
// embedded hits ("flaw" matching "law") are accepted on purpose.

/// Shortest input, in characters after trimming, that can pass the gate.
const MIN_QUESTION_CHARS: usize = 3;

/// Keywords matched anywhere in the question.
const LEGAL_KEYWORDS: &[&str] = &[
    // Basic terms
    "law", "legal", "court", "judge", "lawyer", "attorney", "advocate",
    "case", "lawsuit", "litigation", "trial", "hearing", "verdict",
    // Contracts
    "contract", "agreement", "breach", "terms", "clause", "violation",
    "binding", "negotiation", "dispute", "settlement",
    // Criminal law
    "criminal", "crime", "arrest", "police", "bail", "prison", "jail",
    "theft", "fraud", "assault", "murder", "robbery", "evidence",
    "investigation", "charges", "guilty", "innocent", "conviction",
    // Civil law
    "civil", "plaintiff", "defendant", "damages", "compensation",
    "negligence", "liability", "tort", "injury", "accident",
    // Property law
    "property", "real estate", "land", "ownership", "title", "deed",
    "mortgage", "lease", "rent", "tenant", "landlord", "eviction",
    // Family law
    "divorce", "marriage", "custody", "alimony", "adoption", "inheritance",
    "will", "estate", "guardian", "family court",
    // Business law
    "corporation", "company", "business", "partnership", "tax",
    "intellectual property", "patent", "trademark", "copyright",
    "employment", "workplace", "discrimination", "harassment",
    // Procedure
    "summon", "notice", "petition", "motion", "appeal", "jurisdiction",
    "statute", "regulation", "ordinance", "constitution", "rights",
    "obligation", "duty", "penalty", "fine", "sentence",
    // Indian legal terms
    "ipc", "crpc", "cpc", "indian penal code", "high court", "supreme court",
    "sessions court", "magistrate", "fir", "chargesheet",
    "anticipatory bail", "interim order", "stay order", "injunction",
    // Common phrases
    "legal advice", "legal help", "legal issue", "legal problem",
    "legal matter", "legal question", "legal rights", "legal action",
    "legal proceeding", "legal document", "legal compliance",
    // Phrasings that are usually legal
    "can i sue", "is it legal", "what are my rights", "legal procedure",
    "court process", "how to file", "legal requirement", "violation of",
];

/// Multi-word phrases matched anywhere in the question.
const LEGAL_PATTERNS: &[&str] = &[
    "what is the law", "according to law", "legally speaking",
    "court order", "legal document", "file a case", "legal action",
    "my rights", "legal procedure", "court hearing", "legal advice",
];

/// Phrases matched only against the start of the question.
const LEGAL_QUESTION_STARTS: &[&str] = &[
    "can i legally", "is it illegal", "what does the law say",
    "according to indian law", "under which section", "legal validity",
    "court procedure", "how to file", "legal notice", "summon received",
];

/// Canned reply for prompts that fail the gate. Returned verbatim so the
/// same wording lands in the transcript and in stored history.
pub const NON_LEGAL_RESPONSE: &str = "\n🚫 **Please ask a legal question.**\n\n\
I'm designed to help with legal matters such as:\n\
- Legal advice and procedures\n\
- Court cases and documentation  \n\
- Contract and agreement issues\n\
- Rights and obligations\n\
- Legal compliance matters\n\
- Indian law and regulations\n\n\
Please rephrase your question to focus on legal topics.\n\n";

/// Returns true when the prompt should be answered as a legal question.
///
/// The gate runs in three stages over the trimmed, lowercased input:
/// keywords anywhere, then phrase patterns anywhere, then leading
/// phrases against the start. Inputs shorter than three characters
/// never pass.
pub fn is_legal_question(question: &str) -> bool {
    let trimmed = question.trim();
    if trimmed.chars().count() < MIN_QUESTION_CHARS {
        return false;
    }

    let lowered = trimmed.to_lowercase();

    if LEGAL_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        return true;
    }

    if LEGAL_PATTERNS.iter().any(|pattern| lowered.contains(pattern)) {
        return true;
    }

    LEGAL_QUESTION_STARTS
        .iter()
        .any(|start| lowered.starts_with(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_legal_terms() {
        assert!(is_legal_question("How do I respond to a court summons?"));
        assert!(is_legal_question("My landlord is threatening eviction"));
        assert!(is_legal_question("what is anticipatory bail"));
        assert!(is_legal_question("Explain section 420 of the Indian Penal Code"));
    }

    #[test]
    fn accepts_any_casing() {
        assert!(is_legal_question("CAN I SUE my neighbour for this?"));
        assert!(is_legal_question("LEGAL advice needed"));
    }

    #[test]
    fn rejects_short_or_blank_input() {
        assert!(!is_legal_question(""));
        assert!(!is_legal_question("   "));
        assert!(!is_legal_question("no"));
        assert!(!is_legal_question("  ab  "));
    }

    #[test]
    fn rejects_small_talk() {
        assert!(!is_legal_question("how do i bake a chocolate cake"));
        assert!(!is_legal_question("tell me a joke"));
        assert!(!is_legal_question("who won the cricket match"));
    }

    #[test]
    fn embedded_keyword_matches_count() {
        // Substring containment, not word boundaries.
        assert!(is_legal_question("there is a flaw in this plan"));
        assert!(is_legal_question("the parent company announced results"));
    }

    #[test]
    fn leading_phrases_only_match_at_the_start() {
        assert!(is_legal_question("under which section does this fall"));
        assert!(!is_legal_question(
            "tell me under which section this falls"
        ));
    }

    #[test]
    fn non_legal_reply_asks_for_a_legal_question() {
        assert!(NON_LEGAL_RESPONSE.contains("Please ask a legal question."));
        assert!(NON_LEGAL_RESPONSE.contains("Indian law and regulations"));
    }
}
