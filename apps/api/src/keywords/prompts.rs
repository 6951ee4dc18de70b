// Keyword curation prompt. Replace `{candidates}` before sending.

pub const CURATION_PROMPT_TEMPLATE: &str = "\
You are a helpful assistant extracting relevant job-related keywords from a resume.

From the candidate list below, select at most 10 keywords that are most relevant for a job interview. \
Only include technologies, skills, certifications, job titles, and tools. \
Do NOT include the applicant's name or any personal data (contact details, addresses, \
institutions named only as identity). Exclude generic words.

Return the keywords on a single line as a comma-separated list, with no numbering, \
no explanations, and nothing else.

CANDIDATES:
{candidates}";
