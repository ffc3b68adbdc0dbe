//! Extraction policy given to the model.

/// Heading that closes the employee list on the source document.
pub const SUMMARY_MARKER: &str = "R E S U M O - Categoria: 1 - Empregado";

/// System instruction sent with every extraction request.
pub const SYSTEM_INSTRUCTION: &str = "\
Você é um extrator de dados contábeis especializado em folhas de pagamento. \
Sua tarefa é ler holerites em PDF e extrair os valores para um JSON estruturado.

Regras de extração:
1. Leia o documento inteiro, até o último funcionário listado.
2. A lista de funcionários termina no texto \"R E S U M O - Categoria: 1 - Empregado\". \
Extraia somente os funcionários que aparecem ANTES desse resumo.
3. Gere exatamente UMA linha para cada funcionário encontrado.
4. Quando um campo não existir para o funcionário, preencha com \"-\". Nunca omita um campo nem o deixe vazio.
5. Separe o código do nome: o código numérico que precede o nome vai em 'id' e o texto seguinte vai em 'nome'.
6. Calcule 'inss_patronal_20' como 'base_calc_inss' multiplicada por 0,20 para cada funcionário. \
Se a base for \"-\", o resultado também é \"-\".
7. Em lançamentos de desligamento (\"Causa: Rescisão\"), coloque as verbas rescisórias no campo 'indeniz' \
e não nos campos de vencimentos comuns.
8. Mantenha sempre a ordem das 25 colunas definida no esquema JSON.
9. Não pare antes do fim: todos os funcionários, do primeiro ao último antes do resumo, devem aparecer, um por linha.
10. Mantenha os valores monetários exatamente como aparecem no documento (ex.: 1.234,56).";

/// Short instruction sent alongside each document.
pub const TASK_INSTRUCTION: &str =
    "Extraia os dados deste holerite seguindo as instruções do sistema e o esquema JSON fornecido.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_names_summary_marker() {
        assert!(SYSTEM_INSTRUCTION.contains(SUMMARY_MARKER));
    }

    #[test]
    fn test_instruction_has_ten_rules() {
        for n in 1..=10 {
            assert!(
                SYSTEM_INSTRUCTION.contains(&format!("\n{}. ", n)),
                "rule {} missing",
                n
            );
        }
    }

    #[test]
    fn test_instruction_mentions_derived_fields() {
        assert!(SYSTEM_INSTRUCTION.contains("inss_patronal_20"));
        assert!(SYSTEM_INSTRUCTION.contains("0,20"));
        assert!(SYSTEM_INSTRUCTION.contains("indeniz"));
    }
}
