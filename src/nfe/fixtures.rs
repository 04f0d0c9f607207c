// src/nfe/fixtures.rs
//
// Monta XMLs de NF-e (nfeProc) para os testes.

pub struct NfeBuilder {
    number: String,
    tax_id: String,
    supplier_name: String,
    access_key: String,
    protocol_status: String,
    items: Vec<String>,
    installments: Vec<String>,
    totals: (String, String, String),
}

impl NfeBuilder {
    pub fn new(number: &str, tax_id: &str) -> Self {
        Self {
            number: number.to_string(),
            tax_id: tax_id.to_string(),
            supplier_name: "Distribuidora Auto Peças Ltda".to_string(),
            access_key: format!("3524031234567800019055001{:0>19}", number),
            protocol_status: "100".to_string(),
            items: Vec::new(),
            installments: Vec::new(),
            totals: ("0.00".into(), "0.00".into(), "0.00".into()),
        }
    }

    pub fn access_key(mut self, key: &str) -> Self {
        self.access_key = key.to_string();
        self
    }

    pub fn protocol_status(mut self, code: &str) -> Self {
        self.protocol_status = code.to_string();
        self
    }

    /// Item simples com um grupo de ICMS (`variant`, ex.: "ICMS00" ou "ICMSSN102").
    pub fn item(
        self,
        code: &str,
        line_total: &str,
        variant: &str,
        cst: &str,
        rate: &str,
        value: &str,
    ) -> Self {
        let code_tag = if variant.starts_with("ICMSSN") { "CSOSN" } else { "CST" };
        let icms = format!(
            "<ICMS><{variant}><orig>0</orig><{code_tag}>{cst}</{code_tag}>\
             <pICMS>{rate}</pICMS><vICMS>{value}</vICMS></{variant}></ICMS>"
        );
        self.raw_item(code, line_total, &icms)
    }

    /// Item com o conteúdo de <imposto> informado literalmente.
    pub fn raw_item(mut self, code: &str, line_total: &str, imposto: &str) -> Self {
        let n = self.items.len() + 1;
        self.items.push(format!(
            r#"<det nItem="{n}">
                <prod>
                    <cProd>{code}</cProd><cEAN>7891234567895</cEAN>
                    <xProd>Produto {code}</xProd><NCM>87089990</NCM><CFOP>5102</CFOP>
                    <uCom>UN</uCom><qCom>2.0000</qCom><vUnCom>{line_total}</vUnCom>
                    <vProd>{line_total}</vProd><vFrete>1.00</vFrete>
                </prod>
                <imposto>{imposto}</imposto>
            </det>"#
        ));
        self
    }

    pub fn installment(mut self, number: &str, due_date: &str, value: &str) -> Self {
        self.installments.push(format!(
            "<dup><nDup>{number}</nDup><dVenc>{due_date}</dVenc><vDup>{value}</vDup></dup>"
        ));
        self
    }

    pub fn totals(mut self, products: &str, icms: &str, invoice: &str) -> Self {
        self.totals = (products.to_string(), icms.to_string(), invoice.to_string());
        self
    }

    pub fn build(self) -> String {
        let (v_prod, v_icms, v_nf) = self.totals;
        let cobr = if self.installments.is_empty() {
            String::new()
        } else {
            format!(
                "<cobr><fat><nFat>{}</nFat></fat>{}</cobr>",
                self.number,
                self.installments.join("")
            )
        };

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc versao="4.00">
  <NFe>
    <infNFe Id="NFe{key}" versao="4.00">
      <ide><cUF>35</cUF><nNF>{number}</nNF><serie>1</serie><dhEmi>2024-03-15T10:30:00-03:00</dhEmi></ide>
      <emit>
        <CNPJ>{tax_id}</CNPJ><xNome>{name}</xNome><email>vendas@autopecas.com.br</email>
        <enderEmit>
          <xLgr>Rua das Oficinas</xLgr><nro>120</nro><xBairro>Centro</xBairro>
          <xMun>Campinas</xMun><UF>SP</UF><fone>1932345678</fone>
        </enderEmit>
      </emit>
      <dest><CNPJ>98765432000155</CNPJ><xNome>Oficina Cliente</xNome></dest>
      {items}
      <total>
        <ICMSTot>
          <vBC>0.00</vBC><vICMS>{v_icms}</vICMS><vProd>{v_prod}</vProd><vFrete>0.00</vFrete>
          <vSeg>0.00</vSeg><vDesc>0.00</vDesc><vIPI>0.00</vIPI><vOutro>0.00</vOutro><vNF>{v_nf}</vNF>
        </ICMSTot>
      </total>
      {cobr}
    </infNFe>
  </NFe>
  <protNFe versao="4.00">
    <infProt><chNFe>{key}</chNFe><nProt>135240000000001</nProt><cStat>{status}</cStat></infProt>
  </protNFe>
</nfeProc>"#,
            key = self.access_key,
            number = self.number,
            tax_id = self.tax_id,
            name = self.supplier_name,
            items = self.items.join("\n"),
            status = self.protocol_status,
        )
    }
}
