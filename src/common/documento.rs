use rand::RngExt;
use validator::ValidationError;

// Validação e geração de documentos brasileiros (CPF/CNPJ).
// Os mesmos validadores servem os payloads da API e o seed de demonstração,
// então um documento gerado aqui sempre passa nos formulários.

/// Remove tudo que não for dígito ("529.982.247-25" -> "52998224725").
pub fn normalizar(documento: &str) -> String {
    documento.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn digitos(documento: &str) -> Vec<u32> {
    normalizar(documento)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect()
}

fn digito_verificador(digitos: &[u32], pesos: &[u32]) -> u32 {
    let soma: u32 = digitos.iter().zip(pesos).map(|(d, p)| d * p).sum();
    let resto = soma % 11;
    if resto < 2 { 0 } else { 11 - resto }
}

pub fn validar_cpf(cpf: &str) -> bool {
    let d = digitos(cpf);
    if d.len() != 11 {
        return false;
    }
    // Sequências repetidas ("111.111.111-11") têm dígitos formalmente
    // corretos mas são inválidas na Receita.
    if d.iter().all(|&x| x == d[0]) {
        return false;
    }

    let pesos1: Vec<u32> = (2..=10).rev().collect();
    let pesos2: Vec<u32> = (2..=11).rev().collect();

    digito_verificador(&d[..9], &pesos1) == d[9] && digito_verificador(&d[..10], &pesos2) == d[10]
}

const PESOS_CNPJ_1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const PESOS_CNPJ_2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

pub fn validar_cnpj(cnpj: &str) -> bool {
    let d = digitos(cnpj);
    if d.len() != 14 {
        return false;
    }
    if d.iter().all(|&x| x == d[0]) {
        return false;
    }

    digito_verificador(&d[..12], &PESOS_CNPJ_1) == d[12]
        && digito_verificador(&d[..13], &PESOS_CNPJ_2) == d[13]
}

/// Gera um CPF formatado com dígitos verificadores válidos.
pub fn gerar_cpf() -> String {
    let mut rng = rand::rng();
    loop {
        let base: Vec<u32> = (0..9).map(|_| rng.random_range(0..=9)).collect();
        if base.iter().all(|&x| x == base[0]) {
            continue;
        }

        let pesos1: Vec<u32> = (2..=10).rev().collect();
        let dv1 = digito_verificador(&base, &pesos1);

        let mut com_dv1 = base.clone();
        com_dv1.push(dv1);
        let pesos2: Vec<u32> = (2..=11).rev().collect();
        let dv2 = digito_verificador(&com_dv1, &pesos2);

        let d = &base;
        return format!(
            "{}{}{}.{}{}{}.{}{}{}-{}{}",
            d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7], d[8], dv1, dv2
        );
    }
}

/// Gera um CNPJ de matriz ("0001") formatado, com dígitos válidos.
pub fn gerar_cnpj() -> String {
    let mut rng = rand::rng();
    let mut base: Vec<u32> = (0..8).map(|_| rng.random_range(0..=9)).collect();
    base.extend([0, 0, 0, 1]);

    let dv1 = digito_verificador(&base, &PESOS_CNPJ_1);
    let mut com_dv1 = base.clone();
    com_dv1.push(dv1);
    let dv2 = digito_verificador(&com_dv1, &PESOS_CNPJ_2);

    let d = &base;
    format!(
        "{}{}.{}{}{}.{}{}{}/0001-{}{}",
        d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7], dv1, dv2
    )
}

// Adaptadores para o derive do `validator`.

pub fn cpf_valido(valor: &str) -> Result<(), ValidationError> {
    if validar_cpf(valor) {
        Ok(())
    } else {
        let mut erro = ValidationError::new("cpf_invalido");
        erro.message = Some("CPF inválido.".into());
        Err(erro)
    }
}

pub fn cnpj_valido(valor: &str) -> Result<(), ValidationError> {
    if validar_cnpj(valor) {
        Ok(())
    } else {
        let mut erro = ValidationError::new("cnpj_invalido");
        erro.message = Some("CNPJ inválido.".into());
        Err(erro)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_conhecido_valido() {
        assert!(validar_cpf("529.982.247-25"));
        assert!(validar_cpf("52998224725"));
    }

    #[test]
    fn cpf_invalido_e_rejeitado() {
        assert!(!validar_cpf("529.982.247-26"));
        assert!(!validar_cpf("111.111.111-11"));
        assert!(!validar_cpf("123"));
        assert!(!validar_cpf(""));
    }

    #[test]
    fn cnpj_conhecido_valido() {
        assert!(validar_cnpj("11.222.333/0001-81"));
        assert!(validar_cnpj("11222333000181"));
    }

    #[test]
    fn cnpj_invalido_e_rejeitado() {
        assert!(!validar_cnpj("11.222.333/0001-82"));
        assert!(!validar_cnpj("00000000000000"));
        assert!(!validar_cnpj("11222333"));
    }

    #[test]
    fn cpf_gerado_sempre_passa_no_validador() {
        for _ in 0..100 {
            let cpf = gerar_cpf();
            assert!(validar_cpf(&cpf), "CPF gerado inválido: {cpf}");
        }
    }

    #[test]
    fn cnpj_gerado_sempre_passa_no_validador() {
        for _ in 0..100 {
            let cnpj = gerar_cnpj();
            assert!(validar_cnpj(&cnpj), "CNPJ gerado inválido: {cnpj}");
        }
    }

    #[test]
    fn normalizar_remove_pontuacao() {
        assert_eq!(normalizar("529.982.247-25"), "52998224725");
        assert_eq!(normalizar("11.222.333/0001-81"), "11222333000181");
    }
}
