// Sesión interactiva del asesor: pide los datos del estudiante, llama al
// modelo y muestra la lista numerada.
//
// Entrada y salida son genéricas (`BufRead` / `Write`) para poder probar la
// sesión completa sin terminal. Fin de entrada = cancelación.
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info};

use crate::advisor::{check_recommendations, FilterReport, RecommendationClient};
use crate::catalog::CatalogStore;
use crate::config::MIN_CREDITS;
use crate::models::{parse_course_list, StudentProfile};

pub const CANCELLED_MESSAGE: &str = "Operation cancelled by user.";
pub const UNABLE_MESSAGE: &str = "Unable to generate recommendations at this time.";

fn rule() -> String {
    "=".repeat(60)
}

/// Una línea sin el salto final. `None` en fin de entrada.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

/// Pide los datos del estudiante. Repite la pregunta del nombre mientras
/// venga vacío. `None` si la entrada se acaba antes de terminar.
pub fn read_profile<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<StudentProfile>> {
    writeln!(output, "{}", rule())?;
    writeln!(output, "AI Advisor - Student Schedule Planner")?;
    writeln!(output, "{}", rule())?;
    writeln!(output)?;

    let name = loop {
        writeln!(output, "Enter your name: ")?;
        output.flush()?;
        let Some(name) = read_line(input)? else { return Ok(None) };
        if !name.is_empty() {
            break name;
        }
        writeln!(output, "Name cannot be empty.")?;
    };

    writeln!(output, "\nEnter courses you have **already completed**, separated by commas (e.g., CPSC 1010, ENGL 1030):")?;
    output.flush()?;
    let Some(completed) = read_line(input)? else { return Ok(None) };

    writeln!(output, "\nEnter courses you are **currently enrolled in**, separated by commas (or leave blank if none):")?;
    output.flush()?;
    let Some(current) = read_line(input)? else { return Ok(None) };

    writeln!(output, "\nEnter any time slot constraints (e.g., 'No classes before 10am', or leave blank if none):")?;
    output.flush()?;
    let Some(time) = read_line(input)? else { return Ok(None) };

    match StudentProfile::new(&name, parse_course_list(&completed), parse_course_list(&current), Some(time)) {
        Ok(profile) => Ok(Some(profile)),
        // el bucle de arriba ya descarta nombres vacíos
        Err(e) => Err(io::Error::new(io::ErrorKind::InvalidInput, e)),
    }
}

/// Lista numerada, o el aviso de que no hubo recomendación.
pub fn display_recommendations<W: Write>(output: &mut W, name: &str, recommendations: Option<&[String]>) -> io::Result<()> {
    writeln!(output, "\n{}", rule())?;
    writeln!(output, "Schedule Recommendations for {}", name)?;
    writeln!(output, "{}", rule())?;

    let lines = match recommendations {
        Some(lines) if !lines.is_empty() => lines,
        _ => {
            writeln!(output, "\n{}", UNABLE_MESSAGE)?;
            writeln!(output, "Please check the logs for more details.")?;
            return Ok(());
        }
    };

    writeln!(output, "\nRecommended Schedule:\n")?;
    for (i, line) in lines.iter().enumerate() {
        writeln!(output, "{}. {}", i + 1, line)?;
    }
    writeln!(output, "\n{}", rule())?;
    Ok(())
}

/// Observaciones de la verificación local, si las hay.
pub fn display_report<W: Write>(output: &mut W, report: &FilterReport) -> io::Result<()> {
    if report.is_clean() {
        writeln!(output, "All recommended courses passed the catalog checks ({} credits).", report.credits)?;
    } else {
        writeln!(output, "Catalog checks flagged {} line(s):", report.flagged.len())?;
        for check in &report.flagged {
            for issue in &check.issues {
                writeln!(output, "  - {}: {}", check.line, issue)?;
            }
        }
        writeln!(output, "Credits in the accepted lines: {}", report.credits)?;
    }
    if report.below_regular_load() {
        writeln!(output, "Note: fewer than {} credits is below a regular course load.", MIN_CREDITS)?;
    }
    Ok(())
}

fn session<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    client: &RecommendationClient,
    catalog: Option<&CatalogStore>,
) -> io::Result<i32> {
    let Some(profile) = read_profile(input, output)? else {
        writeln!(output, "\n\n{}", CANCELLED_MESSAGE)?;
        return Ok(1);
    };

    info!("processing schedule request for student: {}", profile.name);
    debug!("completed courses: {}", profile.completed_courses.len());
    debug!("current courses: {}", profile.current_courses.len());

    writeln!(output, "\nGenerating schedule recommendations...")?;
    writeln!(output, "This may take a moment...\n")?;
    output.flush()?;

    let recommendations = client.call_api(&profile);
    display_recommendations(output, &profile.name, recommendations.as_deref())?;

    match recommendations {
        Some(lines) if !lines.is_empty() => {
            if let Some(catalog) = catalog {
                display_report(output, &check_recommendations(&lines, &profile, catalog))?;
            }
            Ok(0)
        }
        _ => Ok(1),
    }
}

/// Sesión completa. Devuelve el código de salida: 0 con recomendación no
/// vacía, 1 si no la hubo, si se canceló o ante un error inesperado.
pub fn run_session<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    client: &RecommendationClient,
    catalog: Option<&CatalogStore>,
) -> i32 {
    match session(input, output, client, catalog) {
        Ok(code) => code,
        Err(e) => {
            error!("unexpected error in advisor session: {}", e);
            let _ = writeln!(output, "\nAn unexpected error occurred. Please check the logs.");
            1
        }
    }
}
