use crate::models::Patient;

/// Build the deterministic report prompt for one patient.
///
/// The instruction template is fixed (summary, implications, lifestyle,
/// follow-up, precautions); only the embedded record fields vary.
pub fn build_report_prompt(patient: &Patient) -> String {
    format!(
        r#"As a medical AI assistant, analyze the following patient data and provide a comprehensive health report:

Patient Information:
- Name: {name}
- Age: {age} years old
- Patient ID: {id}
- Diagnosis: {diagnosis}

Please provide:
1. A clear summary of the diagnosis
2. Potential health implications
3. General lifestyle recommendations
4. Follow-up care suggestions
5. Important precautions or warnings

Keep the report professional, informative, and easy to understand for the patient.
Format the response as a coherent paragraph suitable for a medical report."#,
        name = patient.name,
        age = patient.age,
        id = patient.id,
        diagnosis = patient.diagnosis,
    )
}
