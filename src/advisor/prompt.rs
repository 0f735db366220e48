// Textos que se envían al modelo remoto.
//
// Las reglas de elegibilidad van como instrucciones en lenguaje natural; el
// modelo no está obligado a cumplirlas (ver `postfilter`).
use crate::config::{TARGET_MAX_CREDITS, TARGET_MIN_CREDITS};
use crate::models::StudentProfile;

/// `- X` por línea, o `None` si la lista está vacía.
pub fn format_course_list(courses: &[String]) -> String {
    if courses.is_empty() {
        return "None".to_string();
    }
    courses.iter().map(|c| format!("- {}", c)).collect::<Vec<_>>().join("\n")
}

pub fn build_schedule_prompt(profile: &StudentProfile) -> String {
    build_schedule_prompt_with_credits(profile, TARGET_MIN_CREDITS, TARGET_MAX_CREDITS)
}

pub fn build_schedule_prompt_with_credits(profile: &StudentProfile, min_credits: u32, max_credits: u32) -> String {
    let completed = format_course_list(&profile.completed_courses);
    let current = format_course_list(&profile.current_courses);
    let constraints = profile.time_constraints.as_deref().unwrap_or("None");

    let mut p = String::new();
    p.push_str("I am currently planning my class schedule for the next semester. ");
    p.push_str("Here is a list of courses I have already completed or am currently enrolled in. ");
    p.push_str("Use this to determine which courses I am eligible to take:\n\n");
    p.push_str(&format!("**Completed Courses:**\n{}\n\n", completed));
    p.push_str(&format!("**Currently Enrolled Courses:**\n{}\n\n", current));
    p.push_str(&format!("**Time Constraints:** {}\n\n", constraints));
    p.push_str("**Class Offerings for the Next Semester:** ");
    p.push_str("[Provide the list of available courses in JSON format]\n\n");
    p.push_str("**Task:** Based on the courses I have already completed and the available ");
    p.push_str("class offerings for the next semester, create a class schedule for me. ");
    p.push_str("Please make sure to:\n");
    p.push_str("1. Recommend only those courses for which I meet the prerequisites.\n");
    p.push_str("2. Ensure no recommended courses have overlapping class times.\n");
    p.push_str("3. Align your recommendations with my current academic progress and graduation year.\n");
    p.push_str("4. Ensure the schedule is appropriate for my academic standing and does not ");
    p.push_str("include courses I'm not eligible to take.\n");
    p.push_str(&format!(
        "5. Ensure that your recommended schedule is at least {} credits, use the credit information for each class and aim for {}-{} while staying within the requirements.\n",
        min_credits, min_credits, max_credits
    ));
    p.push_str("6. If a course has prerequisites, only recommend it if I have already completed ");
    p.push_str("or am currently enrolled in those prerequisites.\n");
    p.push_str("7. Do not recommend any course that requires a prerequisite I have not taken ");
    p.push_str("or am not currently enrolled in.");
    p
}

/// Pide al segundo modelo una lista de una clase por línea, envuelta en la
/// plantilla de chat Llama 3.
pub fn build_format_prompt(response: &str) -> String {
    let prompt = format!(
        "Create a list from this data providing the class numbers and class times with each class's data on a separate line: {}",
        response
    );
    format!(
        "<|begin_of_text|><|start_header_id|>user<|end_header_id|>\n{}\n<|eot_id|>\n<|start_header_id|>assistant<|end_header_id|>",
        prompt
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(completed: &[&str], current: &[&str], time: Option<&str>) -> StudentProfile {
        StudentProfile::new(
            "Ada",
            completed.iter().map(|s| s.to_string()).collect(),
            current.iter().map(|s| s.to_string()).collect(),
            time.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn listas_vacias_se_escriben_none() {
        let p = build_schedule_prompt(&profile(&[], &[], None));
        assert!(p.contains("**Completed Courses:**\nNone\n\n"));
        assert!(p.contains("**Currently Enrolled Courses:**\nNone\n\n"));
        assert!(p.contains("**Time Constraints:** None\n\n"));
    }

    #[test]
    fn siete_instrucciones_y_rango_de_creditos() {
        let p = build_schedule_prompt(&profile(&["CPSC 1010", "ENGL 1030"], &["MATH 1060"], Some("No classes before 10am")));
        assert!(p.contains("- CPSC 1010\n- ENGL 1030"));
        assert!(p.contains("- MATH 1060"));
        assert!(p.contains("**Time Constraints:** No classes before 10am"));
        for n in 1..=7 {
            assert!(p.contains(&format!("\n{}. ", n)), "falta la instrucción {}", n);
        }
        assert!(p.contains("at least 16 credits"));
        assert!(p.contains("aim for 16-18"));
        assert!(p.ends_with("or am not currently enrolled in."));
    }

    #[test]
    fn plantilla_de_formato() {
        let p = build_format_prompt("CPSC 2120 MWF 9:05");
        assert!(p.starts_with("<|begin_of_text|><|start_header_id|>user<|end_header_id|>\n"));
        assert!(p.contains("on a separate line: CPSC 2120 MWF 9:05\n<|eot_id|>"));
        assert!(p.ends_with("<|start_header_id|>assistant<|end_header_id|>"));
    }
}
