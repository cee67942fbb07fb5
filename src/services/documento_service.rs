// src/services/documento_service.rs

use chrono::Datelike;
use genpdf::{Element, elements, style};
use image::Luma;
use qrcode::QrCode;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PontoRepository, UsuarioRepository},
    models::ponto::{RegistroPonto, StatusBatida},
};

#[derive(Clone)]
pub struct DocumentoService {
    ponto_repo: PontoRepository,
    usuario_repo: UsuarioRepository,
}

fn rotulo_batida(status: Option<StatusBatida>) -> &'static str {
    match status {
        Some(StatusBatida::Pontual) => "Pontual",
        Some(StatusBatida::Atrasado) => "Atrasado",
        Some(StatusBatida::Antecipado) => "Antecipado",
        Some(StatusBatida::HoraExtra) => "Hora extra",
        None => "-",
    }
}

impl DocumentoService {
    pub fn new(ponto_repo: PontoRepository, usuario_repo: UsuarioRepository) -> Self {
        Self {
            ponto_repo,
            usuario_repo,
        }
    }

    /// Gera o espelho de ponto mensal de um colaborador em PDF.
    pub async fn espelho_mensal(
        &self,
        usuario_id: Uuid,
        mes: u32,
        ano: i32,
    ) -> Result<Vec<u8>, AppError> {
        // 1. Busca os dados
        let usuario = self
            .usuario_repo
            .find_by_id(usuario_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        let registros = self.ponto_repo.por_mes(usuario_id, mes, ano).await?;

        // 2. Configura o PDF. Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Espelho de Ponto {mes:02}/{ano}"));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new("EMBU EXPRESS")
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(format!("Espelho de Ponto — {mes:02}/{ano}"))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Break::new(1.0));

        doc.push(elements::Paragraph::new(format!(
            "Colaborador: {}",
            usuario.nome_completo
        )));
        doc.push(elements::Paragraph::new(format!("CPF: {}", usuario.cpf)));
        doc.push(elements::Break::new(2.0));

        // --- TABELA DE REGISTROS ---
        // Pesos: Dia (2), Entrada (2), Saída (2), Status (3), Saldo (2)
        let mut table = elements::TableLayout::new(vec![2, 2, 2, 3, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Dia").styled(style_bold))
            .element(elements::Paragraph::new("Entrada").styled(style_bold))
            .element(elements::Paragraph::new("Saída").styled(style_bold))
            .element(elements::Paragraph::new("Status").styled(style_bold))
            .element(elements::Paragraph::new("Saldo").styled(style_bold))
            .push()
            .expect("Table error");

        let mut saldo_total: i64 = 0;
        for registro in &registros {
            saldo_total += i64::from(registro.saldo_minutos.unwrap_or(0));
            table
                .row()
                .element(elements::Paragraph::new(
                    registro.entrada_hora.format("%d/%m").to_string(),
                ))
                .element(elements::Paragraph::new(
                    registro.entrada_hora.format("%H:%M").to_string(),
                ))
                .element(elements::Paragraph::new(
                    registro
                        .saida_hora
                        .map(|s| s.format("%H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ))
                .element(elements::Paragraph::new(resumo_status(registro)))
                .element(elements::Paragraph::new(
                    registro
                        .saldo_minutos
                        .map(|s| format!("{s:+} min"))
                        .unwrap_or_else(|| "-".to_string()),
                ))
                .push()
                .expect("Table row error");
        }

        doc.push(table);
        doc.push(elements::Break::new(2.0));

        let mut total = elements::Paragraph::new(format!("SALDO DO MÊS: {saldo_total:+} min"));
        total.set_alignment(genpdf::Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(12)));

        // --- ÁREA DE REPASSE (QR CODE DA CHAVE PIX) ---
        if let Some(chave) = &usuario.chave_pix {
            doc.push(elements::Break::new(2.0));
            doc.push(
                elements::Paragraph::new("REPASSE VIA PIX")
                    .styled(style::Style::new().bold().with_font_size(12)),
            );
            doc.push(elements::Paragraph::new(format!("Chave: {chave}")));
            doc.push(elements::Break::new(1.0));

            let code = QrCode::new(chave.as_bytes())
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

            let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
                .with_scale(genpdf::Scale::new(0.5, 0.5));

            doc.push(pdf_image);
        }

        // Rodapé com a data de emissão
        let hoje = chrono::Utc::now();
        doc.push(elements::Break::new(2.0));
        doc.push(
            elements::Paragraph::new(format!(
                "Emitido em {:02}/{:02}/{}",
                hoje.day(),
                hoje.month(),
                hoje.year()
            ))
            .styled(style::Style::new().italic().with_font_size(8)),
        );

        // 3. Renderiza para buffer em memória
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}

fn resumo_status(registro: &RegistroPonto) -> String {
    format!(
        "{} / {}",
        rotulo_batida(registro.status_entrada),
        rotulo_batida(registro.status_saida)
    )
}
